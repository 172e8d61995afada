use std::path::Path;

use log::info;

use crate::error::Result;
use crate::io::{get_filename, read_file};
use super::generator::Generator;
use super::options::GenerationOptions;
use super::random::RandomSource;
use super::tokenizer::{Token, tokenize};
use super::transition_table::TransitionTable;

/// A Markov text model built from a corpus.
///
/// This struct manages:
/// - `tokens`: the tokenized corpus, kept immutable after construction.
/// - `table`: the transition table, built eagerly in the constructor.
/// - `options`: the default generation options (length, seed, policies).
/// - `corpus_names`: names of the corpus files the model was loaded from.
///
/// Generation only reads the model, so a `MarkovText` can be shared between
/// threads and used by several generations at once.
#[derive(Debug, Clone, Default)]
pub struct MarkovText {
	tokens: Vec<Token>,
	table: TransitionTable,
	options: GenerationOptions,
	corpus_names: Vec<String>,
}

impl MarkovText {
	/// Tokenizes `corpus` and builds its transition table.
	pub fn new(corpus: &str) -> Self {
		Self::with_options(corpus, GenerationOptions::default())
	}

	/// Same as `new`, with explicit default generation options.
	pub fn with_options(corpus: &str, options: GenerationOptions) -> Self {
		let tokens = tokenize(corpus);
		let table = TransitionTable::build(&tokens);
		Self { tokens, table, options, corpus_names: Vec::new() }
	}

	/// Loads and concatenates corpus files, then builds the model.
	///
	/// - Files are joined with a newline, so the last token of one file is
	///   followed by the first token of the next.
	/// - Each file name (without extension) is recorded in `corpus_names`.
	///
	/// # Errors
	/// Returns `MarkovError::Io` if a file cannot be read.
	pub fn from_files<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut corpus = String::new();
		let mut corpus_names = Vec::new();

		for path in paths {
			let path = path.as_ref();
			let text = read_file(path)?;
			info!("loaded corpus {} ({} bytes)", path.display(), text.len());
			if !corpus.is_empty() {
				corpus.push('\n');
			}
			corpus.push_str(&text);
			corpus_names.push(get_filename(path)?);
		}

		let mut model = Self::new(&corpus);
		model.corpus_names = corpus_names;
		Ok(model)
	}

	/// Returns the transition table.
	///
	/// The table is built once in the constructor; calling this repeatedly
	/// always returns the same table.
	pub fn build_transition_table(&self) -> &TransitionTable {
		&self.table
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn corpus_names(&self) -> &[String] {
		&self.corpus_names
	}

	pub fn options(&self) -> &GenerationOptions {
		&self.options
	}

	pub fn options_mut(&mut self) -> &mut GenerationOptions {
		&mut self.options
	}

	/// A generator over this model's table using its policies.
	pub fn generator(&self) -> Generator<'_> {
		Generator::with_options(&self.table, &self.options)
	}

	/// Generates text using the thread-local random generator.
	///
	/// # Errors
	/// - `InvalidArgument` if `max_length` is zero
	/// - `UnknownSeed` if `seed_term` never occurs in the corpus
	/// - `EmptyModel` if the corpus is empty and the policy is `Fail`
	pub fn generate(&self, max_length: usize, seed_term: Option<&str>) -> Result<String> {
		self.generate_with(&mut rand::rng(), max_length, seed_term)
	}

	/// Generates text with a caller-supplied random source.
	///
	/// Output tokens are joined with single spaces.
	pub fn generate_with<R>(&self, rng: &mut R, max_length: usize, seed_term: Option<&str>) -> Result<String>
	where
		R: RandomSource + ?Sized,
	{
		let tokens = self.generator().generate(max_length, seed_term, rng)?;
		Ok(tokens.join(" "))
	}

	/// Generates text using the length and start seed stored in `options`.
	pub fn generate_configured<R>(&self, rng: &mut R) -> Result<String>
	where
		R: RandomSource + ?Sized,
	{
		self.generate_with(rng, self.options.max_length(), self.options.start.term())
	}
}
