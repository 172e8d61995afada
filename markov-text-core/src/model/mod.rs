//! Top-level module for the Markov text generation system.
//!
//! This module provides a word-level, first-order Markov chain, including:
//! - Whitespace tokenization (`tokenizer`)
//! - The transition table built from a token sequence (`TransitionTable`)
//! - Follower lists with frequency-preserving sampling (`Followers`)
//! - Generation options and policies (`GenerationOptions`)
//! - The random walk itself (`Generator`, `Walk`)
//! - A high-level model owning corpus and table (`MarkovText`)

/// Whitespace tokenizer turning a corpus into tokens.
pub mod tokenizer;

/// Duplicate-preserving follower list of a single token.
///
/// Supports uniform sampling where repeated followers are
/// proportionally more likely.
pub mod followers;

/// Transition table mapping each token to its followers.
///
/// Built once from a token sequence in two phases; immutable afterwards.
pub mod transition_table;

/// Injectable source of randomness used by the generator.
pub mod random;

/// Generation configuration: length bound, start seed and the
/// dead-end / empty-model policies.
pub mod options;

/// Random walk over a transition table.
pub mod generator;

/// High-level model combining a corpus, its transition table and
/// default generation options.
pub mod markov_text;
