//! Tokenizer implementations for text analysis.
//!
//! A tokenizer is the first stage of every pipeline. It breaks raw field text
//! into lowercased word candidates and never fails; empty or whitespace-only
//! input yields an empty stream.

use crate::analysis::token::TokenStream;

/// Longest word, in characters after lowercasing, that is indexed or
/// searched. Longer words are dropped by the tokenizer.
///
/// Index files nest one trie level per character, so this also bounds the
/// nesting depth of every file this crate writes or accepts.
pub const MAX_TOKEN_CHARS: usize = 80;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a pipeline can be shared by concurrent
/// queries and by parallel index builds.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> TokenStream;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod separator;

pub use separator::SeparatorTokenizer;
