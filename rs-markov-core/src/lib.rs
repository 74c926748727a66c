//! Word-level Markov chain chatter library.
//!
//! This crate provides a context-stitching reply generator including:
//! - Text normalization and tokenization
//! - A deduplicated line store with stable line references
//! - A context index mapping every word to all of its occurrences
//! - Bidirectional random-walk reply generation with controllable depth
//! - Persistence helpers and an external command registry

/// Core model: line store, context index, learning and reply generation.
pub mod model;

/// Text normalization, segmentation and tokenization.
pub mod text;

/// Chat commands (`!help`, `!words`, ...) dispatched outside the model.
pub mod command;

/// Error type shared by persistence and configuration.
pub mod error;

/// I/O utilities (corpus loading, snapshot paths).
pub mod io;
