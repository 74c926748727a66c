use std::collections::HashMap;

use super::line_store::LineRef;

/// One recorded occurrence of a word.
///
/// Re-tokenizing the referenced line yields the owning word at `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
	pub line: LineRef,
	pub position: usize,
}

/// Mapping from a word to every context it was learned in.
///
/// Conceptually, each word is a node of the chain and its contexts are the
/// places a walk can jump to when it reaches that word.
///
/// ## Invariants
/// - Context lists keep insertion order and are never shrunk
/// - Every list is non-empty: a word only becomes a key through `push`
/// - `total` equals the sum of all list lengths
#[derive(Clone, Debug, Default)]
pub struct ContextIndex {
	words: HashMap<String, Vec<Context>>,
	total: usize,
}

impl ContextIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a context to `word`'s list, creating the entry if needed.
	pub fn push(&mut self, word: &str, context: Context) {
		match self.words.get_mut(word) {
			Some(contexts) => contexts.push(context),
			None => {
				self.words.insert(word.to_owned(), vec![context]);
			}
		}
		self.total += 1;
	}

	/// Returns the contexts of `word`, or `None` if the word is unknown.
	pub fn get(&self, word: &str) -> Option<&[Context]> {
		self.words.get(word).map(Vec::as_slice)
	}

	/// Returns the contexts of a word already known to be indexed.
	///
	/// # Panics
	/// If `word` is not a key. Reply generation only calls this for words
	/// taken from learned lines, which are always indexed.
	pub(crate) fn contexts_of(&self, word: &str) -> &[Context] {
		&self.words[word]
	}

	/// Whether `word` has been learned.
	pub fn contains(&self, word: &str) -> bool {
		self.words.contains_key(word)
	}

	/// Number of distinct known words.
	pub fn word_count(&self) -> usize {
		self.words.len()
	}

	/// Number of contexts across all words.
	pub fn total_contexts(&self) -> usize {
		self.total
	}

	/// Iterates over `(word, contexts)` pairs, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Context])> {
		self.words.iter().map(|(word, contexts)| (word.as_str(), contexts.as_slice()))
	}
}
