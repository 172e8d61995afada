//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = MarkovError> = std::result::Result<T, E>;

/// Failures raised while loading a corpus or generating text.
///
/// Every variant is detected synchronously at the point of violation;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A caller-supplied argument is out of range (ex. `max_length == 0`)
	/// or could not be parsed.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// The seed term was never observed in the corpus.
	#[error("seed term '{0}' not found in corpus")]
	UnknownSeed(String),
	/// The transition table has no keys, so no token can be chosen.
	#[error("transition table is empty")]
	EmptyModel,
	/// Reading a corpus file failed.
	#[error("io error while reading {path:?}: {source}")]
	Io {
		/// Underlying IO error returned by the standard library.
		source: std::io::Error,
		/// Path of the file being read, if known.
		path: Option<PathBuf>,
	},
}

impl MarkovError {
	/// Helper constructor that attaches an optional path when wrapping IO errors.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}

	/// Returns `true` when the error was caused by the caller's input
	/// rather than by the model or the environment.
	pub fn is_caller_error(&self) -> bool {
		matches!(self, Self::InvalidArgument(_) | Self::UnknownSeed(_))
	}
}
