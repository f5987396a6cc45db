//! Scoring of individual postings.

use std::fmt::Debug;

/// Trait for posting scorers.
pub trait Scorer: Send + Sync + Debug {
    /// Contribution of one posting with weight `tf` in a field holding
    /// `field_length` tokens.
    fn score(&self, tf: f64, field_length: usize) -> f64;

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}

/// Inverse document frequency, `ln(1 + N / df)`. Zero when `df` is zero.
pub fn idf(doc_count: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 {
        return 0.0;
    }
    (1.0 + doc_count as f64 / doc_freq as f64).ln()
}

/// TF-IDF scorer for one clause in one field.
///
/// A posting contributes `tf × field boost × clause boost × idf`, optionally
/// scaled by `1 / sqrt(field length)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TfIdfScorer {
    idf: f64,
    boost: f64,
    field_length_norm: bool,
}

impl TfIdfScorer {
    /// Create a scorer for a term with document frequency `doc_freq` among
    /// `doc_count` documents.
    pub fn new(doc_count: usize, doc_freq: usize, field_boost: f64, clause_boost: f64) -> Self {
        TfIdfScorer {
            idf: idf(doc_count, doc_freq),
            boost: field_boost * clause_boost,
            field_length_norm: false,
        }
    }

    /// Enable or disable field-length normalization.
    pub fn with_field_length_norm(mut self, enabled: bool) -> Self {
        self.field_length_norm = enabled;
        self
    }

    /// The idf component.
    pub fn idf(&self) -> f64 {
        self.idf
    }

    /// Combined field and clause boost.
    pub fn boost(&self) -> f64 {
        self.boost
    }
}

impl Scorer for TfIdfScorer {
    fn score(&self, tf: f64, field_length: usize) -> f64 {
        let score = tf * self.boost * self.idf;
        if self.field_length_norm && field_length > 0 {
            score / (field_length as f64).sqrt()
        } else {
            score
        }
    }

    fn name(&self) -> &'static str {
        "tf_idf"
    }
}
