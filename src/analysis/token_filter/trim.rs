//! Trimmer filter implementation.

use super::Filter;
use crate::analysis::token::TokenStream;

/// Pipeline name of the trimmer stage.
pub const TRIMMER: &str = "trimmer";

/// Characters that survive trimming at the edges of a token.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A filter that strips leading and trailing non-word characters.
///
/// Word characters are alphanumerics and `_`. Inner punctuation is kept, so
/// `"didn't,"` becomes `didn't`. Tokens left empty are dropped, and byte
/// offsets are narrowed to the surviving text when the token text is as long
/// as its source span. Lowercasing can change byte length (`İ` becomes
/// `i̇`); such tokens keep their untrimmed span.
#[derive(Clone, Debug, Default)]
pub struct TrimFilter;

impl TrimFilter {
    /// Create a new trim filter.
    pub fn new() -> Self {
        TrimFilter
    }
}

impl Filter for TrimFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        Box::new(tokens.filter_map(|mut token| {
            let trimmed_start = token.text.trim_start_matches(|c: char| !is_word_char(c));
            let leading = token.text.len() - trimmed_start.len();
            let trimmed = trimmed_start.trim_end_matches(|c: char| !is_word_char(c));
            if trimmed.is_empty() {
                return None;
            }
            let trailing = trimmed_start.len() - trimmed.len();

            if leading > 0 || trailing > 0 {
                let span = token.end_offset.checked_sub(token.start_offset);
                if span == Some(token.text.len()) {
                    token.start_offset += leading;
                    token.end_offset -= trailing;
                }
                let text = trimmed.to_string();
                token.text = text;
            }
            Some(token)
        }))
    }

    fn name(&self) -> &'static str {
        TRIMMER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_trim_filter() {
        let filter = TrimFilter::new();
        let tokens = vec![
            Token::with_offsets("(fast).", 0, 10, 17),
            Token::new("didn't,", 1),
            Token::new("⚡", 2),
            Token::new("caramel_library", 3),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "fast");
        assert_eq!(result[0].start_offset, 11);
        assert_eq!(result[0].end_offset, 15);
        assert_eq!(result[1].text, "didn't");
        assert_eq!(result[2].text, "caramel_library");
    }

    #[test]
    fn test_offsets_after_length_changing_lowercase() {
        let filter = TrimFilter::new();
        // "(İx)" is 5 bytes; lowercased "(i̇x)" is 6.
        let tokens = vec![Token::with_offsets("(i\u{307}x)", 0, 4, 9)];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).collect();

        assert_eq!(result[0].text, "i\u{307}x");
        assert_eq!((result[0].start_offset, result[0].end_offset), (4, 9));
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        let filter = TrimFilter::new();
        let tokens = vec![Token::new("«café»", 0)];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).collect();

        assert_eq!(result[0].text, "café");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(TrimFilter::new().name(), "trimmer");
    }
}
