use std::fmt;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use rand::Rng;

use crate::error::Result;
use crate::io::{build_output_path, read_lines, read_snapshot, write_snapshot};
use crate::text::{canonicalize, normalize, segment, tokenize};
use super::context_index::{Context, ContextIndex};
use super::generator;
use super::line_store::LineStore;
use super::reply_config::ReplyConfig;

/// Why a line was not learned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
	/// The raw line starts with a decimal digit.
	LeadingDigit,
	/// The raw line starts with `<`.
	AngleBracket,
	/// The raw line starts with `[`.
	SquareBracket,
	/// Nothing is left once the line is normalized and tokenized.
	Empty,
}

/// Result of learning a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LearnOutcome {
	Learned,
	AlreadyKnown,
	Skipped(SkipReason),
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::LeadingDigit => write!(f, "starts with a digit"),
			SkipReason::AngleBracket => write!(f, "starts with '<'"),
			SkipReason::SquareBracket => write!(f, "starts with '['"),
			SkipReason::Empty => write!(f, "empty"),
		}
	}
}

impl fmt::Display for LearnOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LearnOutcome::Learned => write!(f, "learned"),
			LearnOutcome::AlreadyKnown => write!(f, "already known"),
			LearnOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
		}
	}
}

/// Number of preparation chunks per CPU when importing a corpus.
const CHUNK_FACTOR: usize = 8;

/// The whole learned model.
///
/// A `Brain` owns:
/// - `lines`: every distinct canonical line learned so far
/// - `index`: for every word, each (line, position) it was seen at
/// - `config`: extension depths used when replying
///
/// ## Invariants
/// - For every word `w` and every context `(line, pos)` of `w`,
///   `tokenize(lines.resolve(line))[pos] == w`
/// - A line is indexed exactly once, when it is first interned
///
/// Learning needs `&mut self` and replying only `&self`; a host sharing a
/// brain between threads wraps it in a lock.
#[derive(Clone, Debug, Default)]
pub struct Brain {
	lines: LineStore,
	index: ContextIndex,
	config: ReplyConfig,
}

impl Brain {
	/// Creates an empty brain with the default reply configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty brain using `config` for replies.
	pub fn with_config(config: ReplyConfig) -> Self {
		Self { config, ..Self::default() }
	}

	/// Loads a brain from a corpus file, preferring its binary snapshot.
	///
	/// - `corpus_path` is a text file holding one raw line per line.
	/// - If `<corpus>.bin` exists (see `save`), it is decoded with `postcard`
	///   and its lines are imported instead of the text file.
	/// - A missing corpus gives an empty brain.
	///
	/// # Errors
	/// Returns an error if a file cannot be read or the snapshot is corrupt.
	pub fn open<P: AsRef<Path>>(corpus_path: P) -> Result<Self> {
		let snapshot_path = build_output_path(&corpus_path, "bin")?;
		let mut brain = Self::new();

		if snapshot_path.exists() {
			info!("Loading snapshot {}", snapshot_path.display());
			let lines = read_snapshot(&snapshot_path)?;
			brain.restore_lines(&lines);
		} else if corpus_path.as_ref().exists() {
			info!("Loading corpus {}", corpus_path.as_ref().display());
			brain.load_lines(read_lines(&corpus_path)?)?;
		} else {
			info!("No corpus at {}, starting empty", corpus_path.as_ref().display());
		}

		info!("Parsed {} lines.", brain.line_count());
		info!("{}", brain.summary());
		Ok(brain)
	}

	/// Writes every learned line to the `.bin` snapshot next to `corpus_path`.
	///
	/// # Errors
	/// Returns an error if the snapshot cannot be encoded or written.
	pub fn save<P: AsRef<Path>>(&self, corpus_path: P) -> Result<()> {
		let snapshot_path = build_output_path(&corpus_path, "bin")?;
		let lines: Vec<&str> = self.export_lines().collect();
		write_snapshot(&snapshot_path, &lines)?;
		info!("Saved {} lines to {}", lines.len(), snapshot_path.display());
		Ok(())
	}

	/// Replays lines through `learn`, in order, until one fails to load.
	///
	/// Lines learned before a failure stay learned.
	///
	/// # Returns
	/// The number of lines newly learned.
	///
	/// # Errors
	/// The first error produced by `lines`.
	pub fn load_lines<I, E>(&mut self, lines: I) -> std::result::Result<usize, E>
	where
		I: IntoIterator<Item = std::result::Result<String, E>>,
		E: fmt::Display,
	{
		let mut learned = 0;
		for line in lines {
			let line = match line {
				Ok(line) => line,
				Err(e) => {
					warn!("Load stopped after {} new lines: {}", learned, e);
					return Err(e);
				}
			};
			debug!("Loading line: {}", line);
			if self.learn(&line) == LearnOutcome::Learned {
				learned += 1;
			}
		}
		Ok(learned)
	}

	/// Learns a large set of raw lines.
	///
	/// Normalization and tokenization run in parallel over chunks of the
	/// corpus; indexing stays sequential and in corpus order, so the result
	/// is the same as calling `learn` on each line.
	///
	/// # Returns
	/// The number of lines newly learned.
	pub fn learn_corpus(&mut self, raw_lines: &[String]) -> usize {
		self.import(raw_lines, Self::prepare)
	}

	/// Indexes lines exported by `export_lines`.
	///
	/// The lines are already canonical, so the raw-line skip rules are not
	/// applied: a learned line such as `"3 pigs" ran` is stored as
	/// `3 pigs ran` and must come back as is.
	///
	/// # Returns
	/// The number of lines newly learned.
	pub fn restore_lines(&mut self, canonical_lines: &[String]) -> usize {
		self.import(canonical_lines, Self::prepare_canonical)
	}

	/// Prepares `lines` with `prepare` over parallel chunks, then indexes
	/// them sequentially in input order.
	fn import(&mut self, lines: &[String], prepare: fn(&str) -> std::result::Result<String, SkipReason>) -> usize {
		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = lines.len().div_ceil(chunks).max(1);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (chunk_index, chunk) in lines.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				scope.spawn(move || {
					let prepared: Vec<_> = chunk.iter().map(|line| prepare(line)).collect();
					// The receiver outlives the scope
					let _ = tx.send((chunk_index, prepared));
				});
			}
		});
		drop(tx);

		let mut parts: Vec<_> = rx.iter().collect();
		parts.sort_by_key(|(chunk_index, _)| *chunk_index);

		let mut learned = 0;
		for prepared in parts.into_iter().flat_map(|(_, prepared)| prepared) {
			let outcome = match prepared {
				Ok(canonical) => self.index_line(&canonical),
				Err(reason) => LearnOutcome::Skipped(reason),
			};
			if outcome == LearnOutcome::Learned {
				learned += 1;
			}
		}
		learned
	}

	/// Learns one raw line.
	///
	/// Lines starting with a digit, `<` or `[` are quotes or markup and are
	/// skipped. Otherwise the line is normalized and tokenized; a line whose
	/// canonical form is already stored leaves the brain untouched.
	pub fn learn(&mut self, raw: &str) -> LearnOutcome {
		let outcome = match Self::prepare(raw) {
			Ok(canonical) => self.index_line(&canonical),
			Err(reason) => LearnOutcome::Skipped(reason),
		};
		debug!("{:?}: {}", raw, outcome);
		outcome
	}

	/// Learns free-form text, one outcome per sentence-like segment.
	pub fn ingest(&mut self, text: &str) -> Vec<LearnOutcome> {
		let normalized = normalize(text);
		segment(&normalized).map(|segment| self.learn(segment)).collect()
	}

	/// Builds a reply to `message` using the thread-local random generator.
	///
	/// An empty string means no reply could be produced.
	pub fn reply(&self, message: &str) -> String {
		self.reply_with(message, &mut rand::rng())
	}

	/// Builds a reply to `message` drawing every random choice from `rng`.
	///
	/// With a seeded generator the reply is reproducible.
	pub fn reply_with<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> String {
		self.reply_with_config(message, &self.config, rng)
	}

	/// Same as `reply_with`, overriding the brain's extension depths.
	pub fn reply_with_config<R: Rng + ?Sized>(&self, message: &str, config: &ReplyConfig, rng: &mut R) -> String {
		generator::reply(&self.lines, &self.index, config, message, rng)
	}

	/// Applies the skip rules and computes the canonical form of a raw line.
	fn prepare(raw: &str) -> std::result::Result<String, SkipReason> {
		match raw.chars().next() {
			Some(c) if c.is_ascii_digit() => return Err(SkipReason::LeadingDigit),
			Some('<') => return Err(SkipReason::AngleBracket),
			Some('[') => return Err(SkipReason::SquareBracket),
			_ => (),
		}

		let normalized = normalize(raw);
		let tokens = tokenize(&normalized);
		if tokens.is_empty() {
			return Err(SkipReason::Empty);
		}
		Ok(canonicalize(&tokens))
	}

	/// Re-canonicalizes an exported line without the raw-line skip rules.
	fn prepare_canonical(line: &str) -> std::result::Result<String, SkipReason> {
		let tokens = tokenize(line);
		if tokens.is_empty() {
			return Err(SkipReason::Empty);
		}
		Ok(canonicalize(&tokens))
	}

	/// Stores a canonical line and records one context per token.
	fn index_line(&mut self, canonical: &str) -> LearnOutcome {
		if self.lines.find(canonical).is_some() {
			return LearnOutcome::AlreadyKnown;
		}

		let line = self.lines.intern(canonical);
		for (position, word) in tokenize(canonical).into_iter().enumerate() {
			self.index.push(word, Context { line, position });
		}
		LearnOutcome::Learned
	}

	/// Every learned line, for persistence.
	pub fn export_lines(&self) -> impl Iterator<Item = &str> {
		self.lines.all()
	}

	pub fn config(&self) -> &ReplyConfig {
		&self.config
	}

	pub fn config_mut(&mut self) -> &mut ReplyConfig {
		&mut self.config
	}

	/// Read-only access to the line store.
	pub fn lines(&self) -> &LineStore {
		&self.lines
	}

	/// Read-only access to the context index.
	pub fn index(&self) -> &ContextIndex {
		&self.index
	}

	/// Number of distinct known words.
	pub fn word_count(&self) -> usize {
		self.index.word_count()
	}

	/// Number of recorded contexts across all words.
	pub fn total_contexts(&self) -> usize {
		self.index.total_contexts()
	}

	/// Number of distinct learned lines.
	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	/// Number of contexts of `word`, `None` if the word is unknown.
	pub fn contexts_for(&self, word: &str) -> Option<usize> {
		self.index.get(word).map(<[Context]>::len)
	}

	/// Mean number of contexts per known word, 0.0 for an empty brain.
	pub fn average_contexts_per_word(&self) -> f64 {
		match self.word_count() {
			0 => 0.0,
			words => self.total_contexts() as f64 / words as f64,
		}
	}

	/// One-line description of what the brain knows.
	pub fn summary(&self) -> String {
		format!(
			"I know {} words ({} contexts, {:.2} per word), {} lines.",
			self.word_count(),
			self.total_contexts(),
			self.average_contexts_per_word(),
			self.line_count()
		)
	}

	/// Describes whether `word` is known and how often it was seen.
	pub fn known(&self, word: &str) -> String {
		match self.contexts_for(word) {
			Some(contexts) => format!("{} is known ({} contexts)", word, contexts),
			None => format!("{} is unknown", word),
		}
	}
}
