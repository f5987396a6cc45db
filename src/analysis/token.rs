//! Tokens produced by the pipeline.
//!
//! A [`Token`] carries the normalized text together with the byte range of
//! the word it came from, so the teaser extractor can map a stemmed term back
//! to the words as written.
//!
//! ```
//! use glaive::analysis::pipeline::Pipeline;
//!
//! let text = "Fast builds";
//! let token = Pipeline::english().tokenize(text).nth(1).unwrap();
//! assert_eq!(token.text, "build");
//! assert_eq!(&text[token.start_offset..token.end_offset], "builds");
//! ```

use std::fmt;

/// A normalized word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Normalized text.
    pub text: String,

    /// Index of the word among the tokenizer's output (0-based). Filters
    /// that drop tokens leave gaps.
    pub position: usize,

    /// Byte offset where the word starts in the original text.
    pub start_offset: usize,

    /// Byte offset where the word ends in the original text.
    pub end_offset: usize,
}

impl Token {
    /// Token without source offsets.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    /// Token covering `start_offset..end_offset` of the source text.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Replace the text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lazy sequence of tokens. Owns everything it needs, so it can outlive the
/// text it was created from.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
