/// A unit of text produced by whitespace splitting.
///
/// Tokens are compared by exact string equality; case and punctuation
/// are kept as they appear in the corpus.
pub type Token = String;

/// Splits a corpus into tokens on runs of whitespace.
///
/// Leading and trailing whitespace is ignored, so an empty or
/// all-whitespace corpus yields an empty sequence.
pub fn tokenize(corpus: &str) -> Vec<Token> {
	corpus.split_whitespace().map(str::to_owned).collect()
}
