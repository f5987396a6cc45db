//! The `stopWordFilter` stage.
//!
//! The list is pinned to the one lunr/elasticlunr indexes are built with, so
//! indexes built here agree token for token with indexes produced by those
//! tools.

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;

/// Pipeline name of the stop word stage.
pub const STOP_WORD_FILTER: &str = "stopWordFilter";

/// The English stop list (119 words).
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "able", "about", "across", "after", "all", "almost", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "but", "by", "can", "cannot", "could",
    "dear", "did", "do", "does", "either", "else", "ever", "every", "for", "from", "get", "got",
    "had", "has", "have", "he", "her", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "just", "least", "let", "like", "likely", "may", "me", "might",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
    "other", "our", "own", "rather", "said", "say", "says", "she", "should", "since", "so", "some",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "tis", "to",
    "too", "twas", "us", "wants", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
];

static ENGLISH: LazyLock<Arc<AHashSet<String>>> =
    LazyLock::new(|| Arc::new(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect()));

/// Drops stop words.
///
/// Matching is exact, so the filter must run after lowercasing and trimming.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Filter with the English stop list.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&ENGLISH),
        }
    }

    /// Filter with a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether `word` is dropped.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> TokenStream {
        let stop_words = Arc::clone(&self.stop_words);
        Box::new(tokens.filter(move |token| !stop_words.contains(&token.text)))
    }

    fn name(&self) -> &'static str {
        STOP_WORD_FILTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stop_filter_default_list() {
        let filter = StopFilter::new();
        assert_eq!(filter.len(), 119);

        let tokens = vec![
            Token::new("zap", 0),
            Token::new("is", 1),
            Token::new("a", 2),
            Token::new("build", 3),
            Token::new("system", 4),
            Token::new("it's", 5),
            Token::new("its", 6),
        ];

        let texts: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["zap", "build", "system", "it's"]);
    }

    #[test]
    fn test_custom_stop_words() {
        let filter = StopFilter::from_words(vec!["zap"]);
        assert!(filter.is_stop_word("zap"));
        assert!(!filter.is_stop_word("the"));

        let tokens = vec![Token::new("zap", 0), Token::new("the", 1)];
        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).collect();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "the");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stopWordFilter");
    }
}
