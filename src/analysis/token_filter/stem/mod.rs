//! Stemming token filter and stemmer implementations.

use std::sync::Arc;

use super::Filter;
use crate::analysis::token::TokenStream;

/// Pipeline name of the stemming stage.
pub const STEMMER: &str = "stemmer";

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

pub mod porter;

pub use porter::PorterStemmer;

/// Filter that applies stemming to tokens.
#[derive(Clone)]
pub struct StemFilter {
    stemmer: Arc<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a new stem filter with the Porter stemmer.
    pub fn new() -> Self {
        StemFilter {
            stemmer: Arc::new(PorterStemmer::new()),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        let stemmer = Arc::clone(&self.stemmer);
        Box::new(tokens.map(move |token| {
            let stemmed = stemmer.stem(&token.text);
            token.with_text(stemmed)
        }))
    }

    fn name(&self) -> &'static str {
        STEMMER
    }
}
