use std::collections::HashMap;

/// Stable reference to a line held by a `LineStore`.
///
/// A `LineRef` is an index into the store's arena. Lines are never removed,
/// so a reference stays valid however many lines are added afterwards.
/// Only a `LineStore` creates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineRef(usize);

/// Deduplicated collection of canonical lines.
///
/// ## Invariants
/// - `lines` holds each canonical string at most once
/// - `by_text[lines[i]] == LineRef(i)` for every stored line
#[derive(Clone, Debug, Default)]
pub struct LineStore {
	/// Arena of canonical lines, in insertion order.
	lines: Vec<String>,
	/// Reverse lookup used for deduplication.
	by_text: HashMap<String, LineRef>,
}

impl LineStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the reference of `canonical` if it is already stored.
	pub fn find(&self, canonical: &str) -> Option<LineRef> {
		self.by_text.get(canonical).copied()
	}

	/// Returns the reference of `canonical`, storing it first if needed.
	pub fn intern(&mut self, canonical: &str) -> LineRef {
		if let Some(line) = self.find(canonical) {
			return line;
		}

		let line = LineRef(self.lines.len());
		self.lines.push(canonical.to_owned());
		self.by_text.insert(canonical.to_owned(), line);
		line
	}

	/// Returns the canonical text of a stored line.
	///
	/// # Panics
	/// If `line` was not produced by this store.
	pub fn resolve(&self, line: LineRef) -> &str {
		&self.lines[line.0]
	}

	/// Iterates over every stored line, in insertion order.
	pub fn all(&self) -> impl Iterator<Item = &str> {
		self.lines.iter().map(String::as_str)
	}

	/// Number of stored lines.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}
}
