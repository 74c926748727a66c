use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrainError>;

/// Failures reported by the persistence boundary and configuration setters.
///
/// Empty or unknown input is never an error; see `LearnOutcome` and the
/// empty reply instead.
#[derive(Error, Debug)]
pub enum BrainError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Invalid path: {0}")]
	InvalidPath(String),
}
