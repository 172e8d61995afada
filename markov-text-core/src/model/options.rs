use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};

/// Default number of tokens produced by a generation.
pub const DEFAULT_MAX_LENGTH: usize = 20;

/// What to do when the walk reaches a token with no followers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadEndPolicy {
	/// Stop and return the shorter output.
	#[default]
	StopEarly,
	/// Jump to a uniformly random token and keep going until the
	/// requested length is reached.
	Reseed,
}

/// What to do when asked to generate from a model with no tokens at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyModelPolicy {
	/// Fail with `MarkovError::EmptyModel`.
	Fail,
	/// Return an empty output.
	#[default]
	ReturnEmpty,
}

/// Strategy used to select the first token of a generation.
///
/// # Variants
/// - `Random`: pick a key of the transition table uniformly at random.
/// - `Custom(String)`: start from this token, which must be a key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartSeed {
	#[default]
	Random,
	Custom(String),
}

impl StartSeed {
	/// The seed term, if any.
	pub fn term(&self) -> Option<&str> {
		match self {
			StartSeed::Random => None,
			StartSeed::Custom(term) => Some(term),
		}
	}
}

impl From<Option<String>> for StartSeed {
	fn from(term: Option<String>) -> Self {
		term.map_or(StartSeed::Random, StartSeed::Custom)
	}
}

/// Parses `random`, `none` or `custom:<token>`.
impl FromStr for StartSeed {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self> {
		const CUSTOM: &str = "custom:";

		if s.eq_ignore_ascii_case("random") || s.eq_ignore_ascii_case("none") {
			return Ok(StartSeed::Random);
		}
		if s.get(..CUSTOM.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(CUSTOM)) {
			let value = &s[CUSTOM.len()..];
			if value.is_empty() {
				return Err(MarkovError::InvalidArgument("custom seed cannot be empty".into()));
			}
			return Ok(StartSeed::Custom(value.to_owned()));
		}
		Err(MarkovError::InvalidArgument(
			"seed must be 'random', 'none' or start with 'custom:'".into(),
		))
	}
}

impl FromStr for DeadEndPolicy {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"stop" | "stop_early" | "stop-early" => Ok(DeadEndPolicy::StopEarly),
			"reseed" | "re-seed" => Ok(DeadEndPolicy::Reseed),
			other => Err(MarkovError::InvalidArgument(format!(
				"unknown dead-end policy '{other}', expected 'stop' or 'reseed'"
			))),
		}
	}
}

impl fmt::Display for DeadEndPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeadEndPolicy::StopEarly => f.write_str("stop"),
			DeadEndPolicy::Reseed => f.write_str("reseed"),
		}
	}
}

impl FromStr for EmptyModelPolicy {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_lowercase().as_str() {
			"fail" | "error" => Ok(EmptyModelPolicy::Fail),
			"empty" | "return_empty" | "return-empty" => Ok(EmptyModelPolicy::ReturnEmpty),
			other => Err(MarkovError::InvalidArgument(format!(
				"unknown empty-model policy '{other}', expected 'fail' or 'empty'"
			))),
		}
	}
}

impl fmt::Display for EmptyModelPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EmptyModelPolicy::Fail => f.write_str("fail"),
			EmptyModelPolicy::ReturnEmpty => f.write_str("empty"),
		}
	}
}

/// Parameters of a generation.
///
/// # Responsibilities
/// - Hold the default length bound and start seed used by `MarkovText`
/// - Select the dead-end and empty-model behaviours explicitly
///
/// # Invariants
/// - `max_length` set through `set_max_length` is always > 0. Values coming
///   from deserialization are checked again when generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
	/// Maximum number of tokens to produce.
	max_length: usize,

	/// Behaviour on reaching a token without followers.
	pub dead_end: DeadEndPolicy,

	/// Behaviour when the transition table is empty.
	pub empty_model: EmptyModelPolicy,

	/// How the first token is chosen.
	pub start: StartSeed,
}

impl Default for GenerationOptions {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_LENGTH,
			dead_end: DeadEndPolicy::default(),
			empty_model: EmptyModelPolicy::default(),
			start: StartSeed::default(),
		}
	}
}

impl GenerationOptions {
	/// Creates options with the given length bound and default policies.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_length` is zero.
	pub fn new(max_length: usize) -> Result<Self> {
		let mut options = Self::default();
		options.set_max_length(max_length)?;
		Ok(options)
	}

	pub fn max_length(&self) -> usize {
		self.max_length
	}

	/// Sets the maximum output length.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_length` is zero.
	pub fn set_max_length(&mut self, max_length: usize) -> Result<()> {
		validate_max_length(max_length)?;
		self.max_length = max_length;
		Ok(())
	}
}

pub(crate) fn validate_max_length(max_length: usize) -> Result<()> {
	if max_length == 0 {
		return Err(MarkovError::InvalidArgument(
			"max_length must be a positive integer".to_owned(),
		));
	}
	Ok(())
}
