//! Separator tokenizer: splits on a separator pattern and lowercases.

use std::sync::Arc;

use regex::Regex;

use super::{MAX_TOKEN_CHARS, Tokenizer};
use crate::analysis::token::{Token, TokenStream};
use crate::error::{GlaiveError, Result};

/// Default separator: runs of whitespace or hyphens.
///
/// Punctuation stays attached to the word and is removed later by the
/// trimmer, so `didn't` and `caramel_library` survive as single words.
pub const DEFAULT_SEPARATOR_PATTERN: &str = r"[\s\-]+";

/// Splits text into the pieces between separator matches.
///
/// Every piece is lowercased. Offsets are byte offsets into the original
/// text, so they still cover the word as written. Pieces longer than
/// [`MAX_TOKEN_CHARS`] are skipped, leaving a gap in positions.
#[derive(Clone, Debug)]
pub struct SeparatorTokenizer {
    separator: Arc<Regex>,
}

impl SeparatorTokenizer {
    /// Tokenizer splitting on [`DEFAULT_SEPARATOR_PATTERN`].
    pub fn new() -> Result<Self> {
        Self::with_separator(DEFAULT_SEPARATOR_PATTERN)
    }

    /// Tokenizer splitting on `pattern`. A pattern that matches the empty
    /// string is rejected.
    pub fn with_separator(pattern: &str) -> Result<Self> {
        let separator = Regex::new(pattern)
            .map_err(|e| GlaiveError::config(format!("Invalid separator pattern: {e}")))?;
        if separator.is_match("") {
            return Err(GlaiveError::config(format!(
                "separator pattern `{pattern}` matches the empty string"
            )));
        }
        Ok(SeparatorTokenizer {
            separator: Arc::new(separator),
        })
    }

    /// The separator pattern.
    pub fn pattern(&self) -> &str {
        self.separator.as_str()
    }
}

impl Default for SeparatorTokenizer {
    fn default() -> Self {
        Self::new().expect("default separator pattern is valid")
    }
}

impl Tokenizer for SeparatorTokenizer {
    fn tokenize(&self, text: &str) -> TokenStream {
        Box::new(Pieces {
            separator: Arc::clone(&self.separator),
            text: text.to_string(),
            cursor: 0,
            position: 0,
        })
    }

    fn name(&self) -> &'static str {
        "separator"
    }
}

/// Lazy iterator over the pieces of one text.
struct Pieces {
    separator: Arc<Regex>,
    text: String,
    cursor: usize,
    position: usize,
}

impl Iterator for Pieces {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.cursor < self.text.len() {
            let start = self.cursor;
            let end = match self.separator.find_at(&self.text, start) {
                Some(sep) if sep.start() == start => {
                    self.cursor = sep.end();
                    continue;
                }
                Some(sep) => {
                    self.cursor = sep.end();
                    sep.start()
                }
                None => {
                    self.cursor = self.text.len();
                    self.text.len()
                }
            };

            let position = self.position;
            self.position += 1;
            let word = self.text[start..end].to_lowercase();
            if word.len() > MAX_TOKEN_CHARS && word.chars().count() > MAX_TOKEN_CHARS {
                continue;
            }
            return Some(Token::with_offsets(word, position, start, end));
        }
        None
    }
}
