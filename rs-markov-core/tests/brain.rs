use std::collections::HashSet;
use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::model::brain::{Brain, LearnOutcome, SkipReason};
use rs_markov_core::model::reply_config::ReplyConfig;
use rs_markov_core::text::tokenize;

fn farm() -> Brain {
	let mut brain = Brain::with_config(ReplyConfig::new(1, 2).unwrap());
	brain.ingest("The cat sat on the mat.");
	brain.ingest("The dog sat on the rug.");
	brain
}

fn vocabulary(brain: &Brain) -> HashSet<String> {
	brain
		.export_lines()
		.flat_map(|line| tokenize(line).into_iter().map(str::to_owned).collect::<Vec<_>>())
		.collect()
}

#[test]
fn every_context_points_back_to_its_word() {
	let mut brain = Brain::new();
	brain.ingest("The cat sat on the mat. The dog sat on the rug. What? A cat! On a rug.");
	brain.ingest("the the the. cat sat cat sat");

	let mut checked = 0;
	for (word, contexts) in brain.index().iter() {
		for context in contexts {
			let tokens = tokenize(brain.lines().resolve(context.line));
			assert_eq!(tokens[context.position], word);
			checked += 1;
		}
	}
	assert_eq!(checked, brain.total_contexts());
}

#[test]
fn stitches_fragments_of_different_lines() {
	let brain = farm();
	assert_eq!(brain.contexts_for("sat"), Some(2));

	let vocabulary = vocabulary(&brain);
	let mut replies = HashSet::new();
	for seed in 0..300 {
		let mut rng = StdRng::seed_from_u64(seed);
		let reply = brain.reply_with("sat", &mut rng);

		assert!(tokenize(&reply).contains(&"sat"), "{reply}");
		for token in tokenize(&reply) {
			assert!(vocabulary.contains(token), "{token} not learned");
		}
		replies.insert(reply);
	}

	assert!(replies.contains("the cat sat on the rug."));
	assert!(replies.contains("the dog sat on the mat."));
}

#[test]
fn replies_are_reproducible_with_a_fixed_seed() {
	let mut brain = Brain::new();
	brain.ingest("I like green tea in the morning. Green apples are sour. The morning sun is warm.");
	brain.ingest("Tea and apples make a fine morning. Sour notes in a warm song.");

	for seed in [1, 42, 1337] {
		let first = brain.reply_with("green morning", &mut StdRng::seed_from_u64(seed));
		let second = brain.reply_with("green morning", &mut StdRng::seed_from_u64(seed));
		assert!(!first.is_empty());
		assert_eq!(first, second);
	}
}

#[test]
fn no_reply_without_known_words() {
	let brain = farm();
	assert_eq!(brain.reply(""), "");
	assert_eq!(brain.reply("   \r\n"), "");
	assert_eq!(brain.reply("zebra unicorn"), "");
	assert_eq!(Brain::new().reply("the cat"), "");
}

#[test]
fn replies_only_use_learned_words_whatever_the_depth() {
	let mut brain = Brain::with_config(ReplyConfig::new(2, 6).unwrap());
	brain.ingest("one two three four five six seven. seven six five four three two one. one three five seven");

	let vocabulary = vocabulary(&brain);
	let wide = ReplyConfig::new(1, 9).unwrap();
	for seed in 0..100 {
		let mut rng = StdRng::seed_from_u64(seed);
		let reply = brain.reply_with("four and five", &mut rng);
		let wider = brain.reply_with_config("two", &wide, &mut rng);
		for token in tokenize(&reply).into_iter().chain(tokenize(&wider)) {
			assert!(vocabulary.contains(token));
		}
	}
}

#[test]
fn digit_lines_are_skipped() {
	let mut brain = farm();
	let before = (brain.word_count(), brain.line_count());

	assert_eq!(brain.learn("3 little pigs"), LearnOutcome::Skipped(SkipReason::LeadingDigit));
	assert_eq!((brain.word_count(), brain.line_count()), before);
	assert_eq!(brain.contexts_for("pigs"), None);
}

#[test]
fn relearning_does_not_add_contexts() {
	let mut brain = Brain::new();
	brain.ingest("The cat sat on the mat.");
	let after_first = brain.total_contexts();

	assert_eq!(brain.ingest("The cat sat on the mat."), vec![LearnOutcome::AlreadyKnown]);
	assert_eq!(brain.total_contexts(), after_first);
}

#[test]
fn save_then_open_restores_the_brain() {
	let dir = tempfile::tempdir().unwrap();
	let corpus = dir.path().join("brain.txt");
	fs::write(&corpus, "The cat sat on the mat.\n3 little pigs\n<bot> ignored\nThe dog sat on the rug.\n").unwrap();

	let from_text = Brain::open(&corpus).unwrap();
	assert_eq!(from_text.line_count(), 2);

	let mut grown = from_text.clone();
	grown.ingest("A bird sat on the fence");
	grown.save(&corpus).unwrap();
	assert!(dir.path().join("brain.bin").exists());

	let from_snapshot = Brain::open(&corpus).unwrap();
	assert_eq!(from_snapshot.line_count(), 3);
	assert_eq!(from_snapshot.total_contexts(), grown.total_contexts());
	assert_eq!(from_snapshot.contexts_for("sat"), Some(3));
}

#[test]
fn missing_corpus_gives_an_empty_brain() {
	let dir = tempfile::tempdir().unwrap();
	let brain = Brain::open(dir.path().join("absent.txt")).unwrap();
	assert_eq!(brain.line_count(), 0);
	assert_eq!(brain.average_contexts_per_word(), 0.0);
}

#[test]
fn corrupt_snapshot_fails_to_open() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("brain.bin"), [0x80]).unwrap();
	assert!(Brain::open(dir.path().join("brain.txt")).is_err());
}

#[test]
fn snapshot_keeps_lines_whose_canonical_form_looks_skippable() {
	let dir = tempfile::tempdir().unwrap();
	let corpus = dir.path().join("brain.txt");

	let mut brain = Brain::new();
	assert_eq!(brain.learn("\"3 little pigs\" went home"), LearnOutcome::Learned);
	assert_eq!(brain.learn(" [note] keep this"), LearnOutcome::Learned);
	assert_eq!(brain.learn(" <tag> and more"), LearnOutcome::Learned);
	assert_eq!(brain.learn("plain line"), LearnOutcome::Learned);
	brain.save(&corpus).unwrap();

	let reopened = Brain::open(&corpus).unwrap();
	assert_eq!(reopened.line_count(), 4);
	assert_eq!(reopened.total_contexts(), brain.total_contexts());
	assert_eq!(
		reopened.export_lines().collect::<Vec<_>>(),
		brain.export_lines().collect::<Vec<_>>()
	);
	assert_eq!(reopened.contexts_for("3"), Some(1));
}
