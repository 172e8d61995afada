//! First-order Markov chain text generation library.
//!
//! This crate provides a word-level Markov text generator including:
//! - Whitespace tokenization of a raw corpus
//! - A transition table mapping each token to its observed followers
//! - Random walks over that table with configurable dead-end handling
//! - Small I/O helpers for loading corpora from disk
//!
//! ```
//! use markov_text_core::model::markov_text::MarkovText;
//!
//! # fn main() -> markov_text_core::Result<()> {
//! let model = MarkovText::new("a b a c");
//! let text = model.generate(3, Some("a"))?;
//! assert!(text.starts_with('a'));
//! # Ok(())
//! # }
//! ```

/// Tokenizer, transition table and generation logic.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// I/O utilities (corpus loading, directory listing).
pub mod io;

pub use error::{MarkovError, Result};
