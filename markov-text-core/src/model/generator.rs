use log::trace;

use crate::error::{MarkovError, Result};
use super::options::{DeadEndPolicy, EmptyModelPolicy, GenerationOptions, validate_max_length};
use super::random::RandomSource;
use super::tokenizer::Token;
use super::transition_table::TransitionTable;

/// Random walker over a `TransitionTable`.
///
/// # Responsibilities
/// - Validate the length bound and seed term
/// - Choose the first token (seed or uniform random key)
/// - Step through the chain, sampling each follower uniformly
/// - Apply the configured dead-end and empty-model policies
///
/// The table is only borrowed; any number of generators may walk the same
/// table at once, each with its own random source.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'t> {
	table: &'t TransitionTable,
	dead_end: DeadEndPolicy,
	empty_model: EmptyModelPolicy,
}

impl<'t> Generator<'t> {
	/// Creates a generator with the default policies.
	pub fn new(table: &'t TransitionTable) -> Self {
		Self {
			table,
			dead_end: DeadEndPolicy::default(),
			empty_model: EmptyModelPolicy::default(),
		}
	}

	/// Creates a generator using the policies of `options`.
	pub fn with_options(table: &'t TransitionTable, options: &GenerationOptions) -> Self {
		Self {
			table,
			dead_end: options.dead_end,
			empty_model: options.empty_model,
		}
	}

	pub fn dead_end(mut self, policy: DeadEndPolicy) -> Self {
		self.dead_end = policy;
		self
	}

	pub fn empty_model(mut self, policy: EmptyModelPolicy) -> Self {
		self.empty_model = policy;
		self
	}

	/// Starts a lazy walk of at most `max_length` tokens.
	///
	/// # Errors
	/// - `InvalidArgument` if `max_length` is zero.
	/// - `EmptyModel` if the table is empty and the policy is `Fail`.
	/// - `UnknownSeed` if `seed_term` is not a key of the table.
	///
	/// # Notes
	/// - The empty-model check runs before seed validation, so with
	///   `ReturnEmpty` an empty table yields an empty walk even when a seed
	///   is given.
	pub fn walk<'r, R>(
		&self,
		max_length: usize,
		seed_term: Option<&str>,
		rng: &'r mut R,
	) -> Result<Walk<'t, 'r, R>>
	where
		R: RandomSource + ?Sized,
	{
		validate_max_length(max_length)?;

		let mut walk = Walk {
			table: self.table,
			dead_end: self.dead_end,
			rng,
			remaining: max_length - 1,
			state: WalkState::Stopped,
		};

		if self.table.is_empty() {
			return match self.empty_model {
				EmptyModelPolicy::Fail => Err(MarkovError::EmptyModel),
				EmptyModelPolicy::ReturnEmpty => Ok(walk),
			};
		}

		let start = match seed_term {
			Some(term) => self
				.table
				.key(term)
				.ok_or_else(|| MarkovError::UnknownSeed(term.to_owned()))?,
			None => self
				.table
				.random_token(&mut *walk.rng)
				.ok_or(MarkovError::EmptyModel)?,
		};

		walk.state = WalkState::Start(start);
		Ok(walk)
	}

	/// Generates up to `max_length` tokens.
	///
	/// # Returns
	/// - With `StopEarly`, between 1 and `max_length` tokens; a shorter
	///   output always ends on a dead end.
	/// - With `Reseed`, exactly `max_length` tokens.
	/// - An empty sequence only for an empty table under `ReturnEmpty`.
	pub fn generate<R>(&self, max_length: usize, seed_term: Option<&str>, rng: &mut R) -> Result<Vec<Token>>
	where
		R: RandomSource + ?Sized,
	{
		self.walk(max_length, seed_term, rng)?
			.map(|token| token.map(str::to_owned))
			.collect()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState<'t> {
	/// First token chosen but not yet yielded.
	Start(&'t str),
	/// Last yielded token.
	Stepping(&'t str),
	Stopped,
}

/// Lazy iterator over the tokens of one generation.
///
/// Yields the start token first, then one token per step. Stops when the
/// step budget is spent or, under `StopEarly`, on a dead end.
pub struct Walk<'t, 'r, R: RandomSource + ?Sized> {
	table: &'t TransitionTable,
	dead_end: DeadEndPolicy,
	rng: &'r mut R,
	/// Steps left after the start token.
	remaining: usize,
	state: WalkState<'t>,
}

impl<'t, R: RandomSource + ?Sized> Walk<'t, '_, R> {
	fn step(&mut self, current: &'t str) -> Option<Result<&'t str>> {
		let table = self.table;
		let next = table
			.followers(current)
			.and_then(|followers| followers.predict(&mut *self.rng));

		if let Some(next) = next {
			self.state = WalkState::Stepping(next);
			return Some(Ok(next));
		}

		match self.dead_end {
			DeadEndPolicy::StopEarly => {
				trace!("dead end at '{current}', stopping early");
				self.state = WalkState::Stopped;
				None
			}
			DeadEndPolicy::Reseed => match table.random_token(&mut *self.rng) {
				Some(next) => {
					trace!("dead end at '{current}', re-seeding with '{next}'");
					self.state = WalkState::Stepping(next);
					Some(Ok(next))
				}
				None => {
					self.state = WalkState::Stopped;
					Some(Err(MarkovError::EmptyModel))
				}
			},
		}
	}
}

impl<'t, R: RandomSource + ?Sized> Iterator for Walk<'t, '_, R> {
	type Item = Result<&'t str>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.state {
			WalkState::Stopped => None,
			WalkState::Start(token) => {
				self.state = WalkState::Stepping(token);
				Some(Ok(token))
			}
			WalkState::Stepping(current) => {
				if self.remaining == 0 {
					self.state = WalkState::Stopped;
					return None;
				}
				self.remaining -= 1;
				self.step(current)
			}
		}
	}
}
