use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::debug;
use serde::{Serialize, Serializer};

use super::followers::Followers;
use super::random::{RandomSource, choose};
use super::tokenizer::Token;

/// First-order Markov transition table over word tokens.
///
/// Maps every distinct token of a corpus to the list of tokens observed
/// right after it. The table is built once from a token sequence and never
/// mutated afterwards; a changed corpus means building a new table.
///
/// # Responsibilities
/// - Build the table from a token sequence (followers first, then missing keys)
/// - Look up the followers of a token
/// - Pick a uniformly random key (used for unseeded starts and re-seeding)
///
/// # Invariants
/// - Every token of the source sequence is a key, including the last one
/// - `followers(k)` holds one entry per adjacency `k -> next` in the corpus
/// - `order` lists every key exactly once, in first-seen order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
	/// Mapping from a token to its observed followers.
	states: HashMap<Token, Followers>,

	/// Keys in order of first appearance in the corpus.
	/// Random starts index into this so a seeded source is reproducible.
	order: Vec<Token>,
}

impl TransitionTable {
	/// Builds a transition table from a token sequence.
	///
	/// # Notes
	/// - Phase 1 records a follower for every adjacent pair.
	/// - Phase 2 inserts an empty follower list for tokens that never had a
	///   successor (in practice only the final token can be missing).
	/// - Sequences of length 0 or 1 contain no pairs.
	pub fn build(tokens: &[Token]) -> Self {
		let mut table = Self::default();

		for pair in tokens.windows(2) {
			table.entry(&pair[0]).push(&pair[1]);
		}

		for token in tokens {
			table.entry(token);
		}

		debug!(
			"built transition table: {} tokens, {} keys, {} dead ends",
			tokens.len(),
			table.len(),
			table.dead_ends().count()
		);

		table
	}

	/// Returns the followers of `token`, inserting an empty list if the key
	/// is new. Only used while building.
	fn entry(&mut self, token: &str) -> &mut Followers {
		match self.states.entry(token.to_owned()) {
			Entry::Occupied(occupied) => occupied.into_mut(),
			Entry::Vacant(vacant) => {
				self.order.push(token.to_owned());
				vacant.insert(Followers::new())
			}
		}
	}

	/// Returns the followers of `token`, or `None` if it was never observed.
	pub fn followers(&self, token: &str) -> Option<&Followers> {
		self.states.get(token)
	}

	/// Returns the stored key equal to `token`.
	///
	/// The returned slice borrows from the table, not from `token`.
	pub fn key(&self, token: &str) -> Option<&str> {
		self.states.get_key_value(token).map(|(key, _)| key.as_str())
	}

	pub fn contains(&self, token: &str) -> bool {
		self.states.contains_key(token)
	}

	/// Number of distinct tokens.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Distinct tokens in first-seen order.
	pub fn tokens(&self) -> &[Token] {
		&self.order
	}

	/// Iterates over `(token, followers)` in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Followers)> {
		self.order
			.iter()
			.filter_map(|key| self.states.get(key).map(|f| (key.as_str(), f)))
	}

	/// Tokens with no followers.
	pub fn dead_ends(&self) -> impl Iterator<Item = &str> {
		self.iter().filter(|(_, f)| f.is_empty()).map(|(key, _)| key)
	}

	/// Picks a key uniformly at random, ignoring adjacency.
	///
	/// Returns `None` if the table is empty.
	pub fn random_token<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		choose(&self.order, rng).map(String::as_str)
	}
}

/// Serialized as a map `token -> [followers]`, in first-seen order.
impl Serialize for TransitionTable {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.iter())
	}
}
