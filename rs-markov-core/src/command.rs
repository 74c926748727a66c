use crate::model::brain::Brain;

/// Prefix marking a chat message as a command.
pub const COMMAND_PREFIX: char = '!';

/// A chat command, such as `!words` or `!known <word>`.
///
/// Commands live outside the model: they only use its public learning,
/// reply and statistics API.
pub trait Command: Send + Sync {
	/// Name typed after `!`.
	fn name(&self) -> &str;

	/// One-line description shown by `!help`.
	fn description(&self) -> &str;

	/// Runs the command. `args[0]` is the command name itself.
	fn execute(&self, brain: &mut Brain, args: &[&str]) -> String;
}

/// Ordered set of commands, dispatched by name.
pub struct CommandRegistry {
	commands: Vec<Box<dyn Command>>,
}

impl Default for CommandRegistry {
	/// Registry holding the built-in commands.
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(Box::new(Version));
		registry.register(Box::new(Words));
		registry.register(Box::new(Known));
		registry
	}
}

impl CommandRegistry {
	/// Registry without any command.
	pub fn empty() -> Self {
		Self { commands: Vec::new() }
	}

	/// Adds a command, replacing any command with the same name.
	pub fn register(&mut self, command: Box<dyn Command>) {
		self.commands.retain(|existing| existing.name() != command.name());
		self.commands.push(command);
	}

	/// Iterates over `(name, description)` pairs in registration order.
	pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
		self.commands.iter().map(|command| (command.name(), command.description()))
	}

	/// Runs `message` if it is a known command.
	///
	/// The message is lowercased and split on whitespace; the first word,
	/// without its `!`, selects the command.
	///
	/// `!help` is answered by the registry itself.
	///
	/// Returns `None` if the message is not a command or the command is unknown.
	pub fn dispatch(&self, brain: &mut Brain, message: &str) -> Option<String> {
		let message = message.strip_prefix(COMMAND_PREFIX)?.to_lowercase();
		let args: Vec<&str> = message.split_whitespace().collect();
		let name = args.first()?;

		if *name == "help" {
			return Some(self.help());
		}

		let command = self.commands.iter().find(|command| command.name() == *name)?;
		Some(command.execute(brain, &args))
	}

	fn help(&self) -> String {
		let mut help = String::from("Core commands:\n");
		help.push_str(&format!("{}help: Show this command list\n", COMMAND_PREFIX));
		for (name, description) in self.descriptions() {
			help.push_str(&format!("{}{}: {}\n", COMMAND_PREFIX, name, description));
		}
		help
	}
}

struct Version;

impl Command for Version {
	fn name(&self) -> &str {
		"version"
	}

	fn description(&self) -> &str {
		"Show the program version"
	}

	fn execute(&self, _: &mut Brain, _: &[&str]) -> String {
		format!("I am rs-markov v{}", env!("CARGO_PKG_VERSION"))
	}
}

struct Words;

impl Command for Words {
	fn name(&self) -> &str {
		"words"
	}

	fn description(&self) -> &str {
		"Show how many words, contexts and lines are known"
	}

	fn execute(&self, brain: &mut Brain, _: &[&str]) -> String {
		brain.summary()
	}
}

struct Known;

impl Command for Known {
	fn name(&self) -> &str {
		"known"
	}

	fn description(&self) -> &str {
		"Tell whether a word is known: !known <word>"
	}

	fn execute(&self, brain: &mut Brain, args: &[&str]) -> String {
		match args.get(1) {
			Some(word) => brain.known(word),
			None => "Not enough parameters, usage: !known <word>".to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Learn;

	impl Command for Learn {
		fn name(&self) -> &str {
			"learn"
		}

		fn description(&self) -> &str {
			"Learn the rest of the message"
		}

		fn execute(&self, brain: &mut Brain, args: &[&str]) -> String {
			let outcomes = brain.ingest(&args[1..].join(" "));
			format!("{} segments", outcomes.len())
		}
	}

	#[test]
	fn plain_messages_are_not_commands() {
		let mut brain = Brain::new();
		let registry = CommandRegistry::default();
		assert_eq!(registry.dispatch(&mut brain, "hello there"), None);
		assert_eq!(registry.dispatch(&mut brain, "!"), None);
		assert_eq!(registry.dispatch(&mut brain, "!nope"), None);
	}

	#[test]
	fn known_reports_contexts() {
		let mut brain = Brain::new();
		brain.learn("the cat sat");
		let registry = CommandRegistry::default();

		assert_eq!(registry.dispatch(&mut brain, "!KNOWN Cat"), Some("cat is known (1 contexts)".to_owned()));
		assert_eq!(registry.dispatch(&mut brain, "!known dog"), Some("dog is unknown".to_owned()));
		assert_eq!(
			registry.dispatch(&mut brain, "!known"),
			Some("Not enough parameters, usage: !known <word>".to_owned())
		);
	}

	#[test]
	fn words_uses_summary() {
		let mut brain = Brain::new();
		brain.learn("a b");
		let registry = CommandRegistry::default();
		assert_eq!(registry.dispatch(&mut brain, "!words"), Some(brain.summary()));
	}

	#[test]
	fn help_lists_registered_commands() {
		let mut brain = Brain::new();
		let mut registry = CommandRegistry::default();
		registry.register(Box::new(Learn));

		let help = registry.dispatch(&mut brain, "!help").unwrap_or_default();
		for name in ["!help", "!version", "!words", "!known", "!learn"] {
			assert!(help.contains(name), "{name} missing from {help}");
		}
	}

	#[test]
	fn custom_commands_can_mutate_the_brain() {
		let mut brain = Brain::new();
		let mut registry = CommandRegistry::default();
		registry.register(Box::new(Learn));

		assert_eq!(registry.dispatch(&mut brain, "!learn one. two"), Some("2 segments".to_owned()));
		assert_eq!(brain.line_count(), 2);
	}
}
