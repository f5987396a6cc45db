//! Teaser extraction: a short excerpt of stored text around the first
//! matching word.

use std::collections::BTreeSet;

use crate::analysis::pipeline::Pipeline;

/// Marker placed where the excerpt cuts the text.
pub const ELLIPSIS: &str = "…";

/// Cut a window of `word_count` words from `text`.
///
/// The window opens shortly before the first word whose normalized form is
/// in `terms` (a quarter of the window is spent on leading context) and is
/// shifted back when it would run past the end. Without a matching word the
/// window starts at the beginning. Returns `None` for empty text or a zero
/// word count.
pub fn extract(
    text: &str,
    pipeline: &Pipeline,
    terms: &BTreeSet<String>,
    word_count: usize,
) -> Option<String> {
    if word_count == 0 {
        return None;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let hit = words
        .iter()
        .position(|word| pipeline.tokenize(word).any(|token| terms.contains(&token.text)))
        .unwrap_or(0);

    let len = words.len();
    let mut start = hit.saturating_sub(word_count / 4);
    if start + word_count > len {
        start = len.saturating_sub(word_count);
    }
    let end = (start + word_count).min(len);

    let mut teaser = String::new();
    if start > 0 {
        teaser.push_str(ELLIPSIS);
        teaser.push(' ');
    }
    teaser.push_str(&words[start..end].join(" "));
    if end < len {
        teaser.push(' ');
        teaser.push_str(ELLIPSIS);
    }
    Some(teaser)
}
