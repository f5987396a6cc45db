//! Token filter implementations for token transformation.
//!
//! Filters wrap a [`TokenStream`] and return a new one. They are lazy: no
//! work happens until the caller pulls tokens, and a filter that drops a
//! token simply never yields it.
//!
//! ```text
//! Tokenizer (split + lowercase) → Trimmer → Stop Words → Stemmer → Index
//! ```

use crate::analysis::token::TokenStream;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> TokenStream;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod stem;
pub mod stop;
pub mod trim;

pub use stem::{PorterStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
pub use trim::TrimFilter;
