use std::collections::VecDeque;

use rand::Rng;

use crate::text::{normalize, segment, tokenize};
use super::context_index::ContextIndex;
use super::line_store::LineStore;
use super::reply_config::ReplyConfig;

/// Builds a reply to `message` by walking the context index.
///
/// The walk goes through the following phases:
/// - **Seed**: among the message words the index knows, keep those with the
///   fewest contexts and pick one uniformly. Rare words make better pivots
///   than common ones.
/// - **Left**: repeatedly sample a context of the leftmost word and prepend
///   up to `depth` tokens that preceded it in that line, until a line start
///   is reached.
/// - **Right**: same on the rightmost word, appending the tokens that
///   followed it, until a line end is reached.
///
/// Every step samples a fresh context, so neighbouring fragments of the
/// reply usually come from different learned lines.
///
/// Returns an empty string when the message has no word or no known word.
pub(crate) fn reply<R: Rng + ?Sized>(
	lines: &LineStore,
	index: &ContextIndex,
	config: &ReplyConfig,
	message: &str,
	rng: &mut R,
) -> String {
	let normalized = normalize(message);
	let words: Vec<&str> = segment(&normalized).flat_map(tokenize).collect();

	let Some(seed) = select_seed(index, &words, rng) else {
		return String::new();
	};

	let mut sentence = VecDeque::from([seed]);
	extend_left(lines, index, config, &mut sentence, rng);
	extend_right(lines, index, config, &mut sentence, rng);

	let mut reply = String::new();
	for (i, word) in sentence.iter().enumerate() {
		if i > 0 {
			reply.push(' ');
		}
		reply.push_str(word);
	}
	reply
}

/// Picks the seed word among the known words with the fewest contexts.
///
/// Ties are all kept as candidates; a word repeated in the message is a
/// candidate once per occurrence.
fn select_seed<'a, R: Rng + ?Sized>(index: &ContextIndex, words: &[&'a str], rng: &mut R) -> Option<&'a str> {
	let mut fewest: Option<usize> = None;
	let mut candidates: Vec<&'a str> = Vec::new();

	for &word in words {
		let Some(contexts) = index.get(word) else {
			continue;
		};
		let count = contexts.len();
		match fewest {
			Some(k) if count > k => (),
			Some(k) if count == k => candidates.push(word),
			_ => {
				fewest = Some(count);
				candidates.clear();
				candidates.push(word);
			}
		}
	}

	if candidates.is_empty() {
		return None;
	}
	Some(candidates[rng.random_range(0..candidates.len())])
}

/// Prepends tokens until a sampled context sits at the start of its line.
fn extend_left<'a, R: Rng + ?Sized>(
	lines: &'a LineStore,
	index: &ContextIndex,
	config: &ReplyConfig,
	sentence: &mut VecDeque<&'a str>,
	rng: &mut R,
) {
	loop {
		let edge = sentence[0];
		let contexts = index.contexts_of(edge);
		let context = contexts[rng.random_range(0..contexts.len())];

		// Re-tokenized every step: the sampled context may point to any line
		let tokens = tokenize(lines.resolve(context.line));
		let w = context.position;
		debug_assert_eq!(tokens.get(w).copied(), Some(edge));

		let depth = rng.random_range(config.depth_range());
		for i in 1..=depth {
			if i > w {
				return;
			}
			sentence.push_front(tokens[w - i]);
			if i == w {
				return;
			}
		}
	}
}

/// Appends tokens until a sampled context sits at the end of its line.
fn extend_right<'a, R: Rng + ?Sized>(
	lines: &'a LineStore,
	index: &ContextIndex,
	config: &ReplyConfig,
	sentence: &mut VecDeque<&'a str>,
	rng: &mut R,
) {
	loop {
		let edge = sentence[sentence.len() - 1];
		let contexts = index.contexts_of(edge);
		let context = contexts[rng.random_range(0..contexts.len())];

		let tokens = tokenize(lines.resolve(context.line));
		let w = context.position;
		debug_assert_eq!(tokens.get(w).copied(), Some(edge));

		let depth = rng.random_range(config.depth_range());
		for i in 1..=depth {
			match tokens.get(w + i).copied() {
				Some(token) => sentence.push_back(token),
				None => return,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::model::context_index::Context;

	fn index_of(lines: &mut LineStore, index: &mut ContextIndex, canonical: &str) {
		let line = lines.intern(canonical);
		for (position, word) in tokenize(canonical).into_iter().enumerate() {
			index.push(word, Context { line, position });
		}
	}

	#[test]
	fn seed_prefers_rarest_known_word() {
		let mut lines = LineStore::new();
		let mut index = ContextIndex::new();
		index_of(&mut lines, &mut index, "the cat sat");
		index_of(&mut lines, &mut index, "the dog ran");

		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..50 {
			let seed = select_seed(&index, &["the", "unknown", "cat"], &mut rng);
			assert_eq!(seed, Some("cat"));
		}
	}

	#[test]
	fn seed_keeps_every_tie() {
		let mut lines = LineStore::new();
		let mut index = ContextIndex::new();
		index_of(&mut lines, &mut index, "the cat sat");
		index_of(&mut lines, &mut index, "the dog ran");

		let mut rng = StdRng::seed_from_u64(11);
		let mut seen: HashSet<&str> = HashSet::new();
		for _ in 0..200 {
			if let Some(seed) = select_seed(&index, &["cat", "dog", "the"], &mut rng) {
				seen.insert(seed);
			}
		}
		let expected: HashSet<&str> = ["cat", "dog"].into_iter().collect();
		assert_eq!(seen, expected);
	}

	#[test]
	fn no_known_word_means_no_seed() {
		let index = ContextIndex::new();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(select_seed(&index, &["nothing", "here"], &mut rng), None);
		assert_eq!(select_seed(&index, &[], &mut rng), None);
	}

	#[test]
	fn single_line_is_reproduced() {
		let mut lines = LineStore::new();
		let mut index = ContextIndex::new();
		index_of(&mut lines, &mut index, "one two three four five");

		let config = ReplyConfig::default();
		let mut rng = StdRng::seed_from_u64(3);
		for word in ["one", "three", "five"] {
			let generated = reply(&lines, &index, &config, word, &mut rng);
			assert_eq!(generated, "one two three four five");
		}
	}
}
