use std::io::{self, BufRead};

use rs_markov_core::command::CommandRegistry;
use rs_markov_core::model::brain::Brain;

const CORPUS_PATH: &str = "./data/brain.txt";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see every loaded line
    env_logger::init();

    // Load the brain from "./data/brain.txt"
    // Load automatically brain.bin if existing
    let mut brain = Brain::open(CORPUS_PATH)?;

    // Each extension step copies between 1 and 4 words from a learned line
    // (upper bound excluded). Smaller values mix lines more aggressively
    brain.config_mut().set_depth_range(1, 5)?;

    // Commands such as "!words" or "!known cat" are handled here,
    // outside the model
    let commands = CommandRegistry::default();

    println!("{}", brain.summary());
    println!("Type a message, !help for commands, !quit to save and exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let message = line?;
        let message = message.trim();

        if message.eq_ignore_ascii_case("!quit") {
            break;
        }

        if let Some(answer) = commands.dispatch(&mut brain, message) {
            println!("{}", answer.trim_end());
            // "!quit" belongs to this console, not to the registry
            if message.eq_ignore_ascii_case("!help") {
                println!("!quit: Save the brain and exit");
            }
            continue;
        }

        // Answer with what is already known, then learn from the message
        let reply = brain.reply(message);
        if !reply.is_empty() {
            println!("{}", reply);
        }
        brain.ingest(message);
    }

    brain.save(CORPUS_PATH)?;
    println!("{}", brain.summary());

    Ok(())
}
