use serde::Serialize;

use super::random::{RandomSource, choose};
use super::tokenizer::Token;

/// Tokens observed immediately after a given token.
///
/// Conceptually, this is the outgoing edge list of one node in the
/// Markov chain. Unlike a count map, every observation is kept as its own
/// entry, so a follower seen twice is drawn twice as often.
///
/// ## Invariants
/// - Entries are kept in corpus order
/// - Duplicates are intentional and never collapsed
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Followers {
	tokens: Vec<Token>,
}

impl Followers {
	/// Creates an empty follower list (a dead end).
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more observation of `next` following the owner token.
	pub(crate) fn push(&mut self, next: &str) {
		self.tokens.push(next.to_owned());
	}

	/// Number of recorded observations, duplicates included.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Returns `true` if nothing ever followed the owner token.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn as_slice(&self) -> &[Token] {
		&self.tokens
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}

	/// How many times `token` was observed as a follower.
	pub fn count_of(&self, token: &str) -> usize {
		self.tokens.iter().filter(|t| *t == token).count()
	}

	/// Draws the next token uniformly from the recorded observations.
	///
	/// Returns `None` if the list is empty.
	pub fn predict<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		choose(&self.tokens, rng).map(String::as_str)
	}
}
