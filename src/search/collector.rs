//! Top-N collection of scored documents.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::index::document::DocId;

/// A scored document for use in the heap.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDoc {
    /// Document id.
    pub doc_id: DocId,
    /// Accumulated score.
    pub score: f64,
}

impl ScoredDoc {
    /// Result order: higher score first, then lower id.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    // Max-heap on rank, so the worst kept document is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank(other)
    }
}

/// A collector that keeps the top N documents by score, breaking ties by
/// ascending document id.
#[derive(Debug)]
pub struct TopDocsCollector {
    /// Maximum number of documents to collect.
    max_docs: usize,
    /// Collected hits, worst on top.
    hits: BinaryHeap<ScoredDoc>,
    /// Total number of documents offered.
    total_hits: usize,
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    /// Get the maximum number of documents to collect.
    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    /// Total number of documents offered so far.
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// Offer a document.
    pub fn collect(&mut self, doc_id: DocId, score: f64) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        let scored_doc = ScoredDoc { doc_id, score };
        if self.hits.len() < self.max_docs {
            self.hits.push(scored_doc);
        } else if let Some(worst) = self.hits.peek() {
            if scored_doc < *worst {
                self.hits.pop();
                self.hits.push(scored_doc);
            }
        }
    }

    /// The kept documents, best first.
    pub fn into_sorted_vec(self) -> Vec<ScoredDoc> {
        // Ascending by `Ord` is best first.
        self.hits.into_sorted_vec()
    }
}
