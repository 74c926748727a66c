//! Top-level module for the context-stitching chatter model.
//!
//! This module provides:
//! - A deduplicating line arena (`LineStore`)
//! - The word to occurrences index (`ContextIndex`)
//! - The model object tying both together (`Brain`)
//! - Reply generation parameters (`ReplyConfig`)
//! - The bidirectional reply walk (`generator`)

/// The model object: learning, statistics and persistence entry points.
pub mod brain;

/// Append-only, deduplicated store of canonical lines.
///
/// Lines are addressed by `LineRef`, an index that stays valid as the
/// store grows.
pub mod line_store;

/// Mapping from each known word to every position it occupied.
pub mod context_index;

/// Bidirectional random walk producing a reply from a seed word.
///
/// Only reachable through `Brain::reply` and `Brain::reply_with`.
mod generator;

/// Extension depth configuration used by reply generation.
pub mod reply_config;
