use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{BrainError, Result};

/// Default lower bound (inclusive) of the extension depth.
pub const DEFAULT_MIN_DEPTH: usize = 1;

/// Default upper bound (exclusive) of the extension depth.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Parameters of the reply walk.
///
/// Each extension step copies between `min_depth` and `max_depth - 1`
/// tokens from the sampled source line before sampling a new context.
/// Small depths stitch more aggressively across lines, large depths
/// reproduce longer runs of learned text.
///
/// # Invariants
/// - `min_depth >= 1`
/// - `max_depth > min_depth`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "RawReplyConfig")]
pub struct ReplyConfig {
	min_depth: usize,
	max_depth: usize,
}

/// Unchecked form used for deserialization.
#[derive(Deserialize)]
struct RawReplyConfig {
	min_depth: usize,
	max_depth: usize,
}

impl TryFrom<RawReplyConfig> for ReplyConfig {
	type Error = BrainError;

	fn try_from(raw: RawReplyConfig) -> Result<Self> {
		Self::new(raw.min_depth, raw.max_depth)
	}
}

impl Default for ReplyConfig {
	fn default() -> Self {
		Self { min_depth: DEFAULT_MIN_DEPTH, max_depth: DEFAULT_MAX_DEPTH }
	}
}

impl ReplyConfig {
	/// Creates a configuration drawing depths from `[min_depth, max_depth)`.
	///
	/// # Errors
	/// Returns an error if `min_depth` is 0 or the range is empty.
	pub fn new(min_depth: usize, max_depth: usize) -> Result<Self> {
		let mut config = Self::default();
		config.set_depth_range(min_depth, max_depth)?;
		Ok(config)
	}

	pub fn min_depth(&self) -> usize {
		self.min_depth
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Half-open range the extension depth is drawn from.
	pub fn depth_range(&self) -> Range<usize> {
		self.min_depth..self.max_depth
	}

	/// Replaces the depth range.
	///
	/// # Errors
	/// Returns an error if `min_depth` is 0 or `max_depth <= min_depth`;
	/// the current range is kept in that case.
	pub fn set_depth_range(&mut self, min_depth: usize, max_depth: usize) -> Result<()> {
		if min_depth == 0 {
			return Err(BrainError::InvalidConfig("min_depth must be >= 1".to_owned()));
		}
		if max_depth <= min_depth {
			return Err(BrainError::InvalidConfig(format!(
				"max_depth ({}) must be greater than min_depth ({})",
				max_depth, min_depth
			)));
		}
		self.min_depth = min_depth;
		self.max_depth = max_depth;
		Ok(())
	}
}
