//! Query evaluation against an [`Index`].
//!
//! Evaluation is pure: every call works on local accumulators and reads the
//! index without locking, so any number of searches may run concurrently
//! against the same index.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use crate::index::Index;
use crate::index::document::DocId;
use crate::search::collector::TopDocsCollector;
use crate::search::options::{CombineWith, SearchOptions};
use crate::search::query::Query;
use crate::search::scorer::{Scorer, TfIdfScorer};
use crate::search::teaser;

/// A single ranked result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
    /// Document id.
    pub doc_id: DocId,
    /// Url from `doc_urls`.
    pub url: String,
    /// Summed score.
    pub score: f64,
    /// Matched index terms, each with the fields it matched in.
    pub matched_terms: BTreeMap<String, BTreeSet<String>>,
    /// Excerpt of the best matching stored field.
    pub teaser: Option<String>,
}

#[derive(Default)]
struct Accumulator {
    score: f64,
    matched_terms: BTreeMap<String, BTreeSet<String>>,
    matched_tokens: BTreeSet<usize>,
}

/// Run `text` against `index`.
///
/// Returns at most `options.limit` hits ordered by descending score, ties
/// broken by ascending document id. A query that normalizes to nothing
/// returns no hits.
pub fn search(index: &Index, text: &str, options: &SearchOptions) -> Vec<SearchHit> {
    let query = Query::parse(index, text, options);
    execute(index, &query, options)
}

/// Evaluate an already parsed query.
pub fn execute(index: &Index, query: &Query, options: &SearchOptions) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }

    let doc_count = index.doc_count();
    let mut accumulators: BTreeMap<DocId, Accumulator> = BTreeMap::new();

    for clause in &query.clauses {
        for field in &query.fields {
            let Some(postings) = index.trie(field).and_then(|trie| trie.postings(&clause.term))
            else {
                continue;
            };
            let field_boost = options.boost(field);
            let scorer = TfIdfScorer::new(doc_count, postings.len(), field_boost, clause.boost)
                .with_field_length_norm(options.field_length_norm);

            for (&doc_id, &tf) in postings {
                let accumulator = accumulators.entry(doc_id).or_default();
                accumulator.score += scorer.score(tf, index.field_length(doc_id, field));
                accumulator
                    .matched_terms
                    .entry(clause.term.clone())
                    .or_default()
                    .insert(field.clone());
                accumulator.matched_tokens.insert(clause.source);
            }
        }
    }

    let matched = accumulators.len();
    if options.combine_with == CombineWith::And {
        let required = query.tokens.len();
        accumulators.retain(|_, acc| acc.matched_tokens.len() == required);
    }

    let mut collector = TopDocsCollector::new(options.limit);
    for (&doc_id, accumulator) in &accumulators {
        collector.collect(doc_id, accumulator.score);
    }
    debug!(
        "{} documents matched, {} kept, returning up to {}",
        matched,
        collector.total_hits(),
        options.limit
    );

    collector
        .into_sorted_vec()
        .into_iter()
        .filter_map(|scored| {
            let accumulator = accumulators.remove(&scored.doc_id)?;
            let teaser = build_teaser(index, scored.doc_id, &accumulator.matched_terms, options);
            Some(SearchHit {
                doc_id: scored.doc_id,
                url: index.doc_url(scored.doc_id).unwrap_or_default().to_string(),
                score: scored.score,
                matched_terms: accumulator.matched_terms,
                teaser,
            })
        })
        .collect()
}

/// Teaser from the longest stored field among those that matched; ties go to
/// the field listed first in the index.
fn build_teaser(
    index: &Index,
    doc_id: DocId,
    matched_terms: &BTreeMap<String, BTreeSet<String>>,
    options: &SearchOptions,
) -> Option<String> {
    let mut best: Option<(&str, &str)> = None;
    for field in index.fields() {
        if !matched_terms.values().any(|fields| fields.contains(field)) {
            continue;
        }
        let Some(text) = index.stored_text(doc_id, field) else {
            continue;
        };
        let longer = best.is_none_or(|(_, current)| text.chars().count() > current.chars().count());
        if longer {
            best = Some((field, text));
        }
    }

    let (field, text) = best?;
    let terms: BTreeSet<String> = matched_terms
        .iter()
        .filter(|(_, fields)| fields.contains(field))
        .map(|(term, _)| term.clone())
        .collect();
    teaser::extract(text, index.pipeline(), &terms, options.teaser_word_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Document, IndexConfig, build};

    fn page(url: &str, title: &str, body: &str) -> Document {
        Document::builder()
            .url(url)
            .title(title)
            .body(body)
            .breadcrumbs(title)
            .build()
    }

    #[test]
    fn test_ranking_and_matched_terms() {
        let index = build(
            vec![
                page("a.html", "Alpha", "polyglot builds for polyglot teams"),
                page("b.html", "Beta", "polyglot teams"),
                page("c.html", "Gamma", "unrelated"),
            ],
            IndexConfig::default(),
        )
        .unwrap()
        .index;

        let hits = search(&index, "polyglot", &SearchOptions::default());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, 0);
        assert_eq!(hits[0].url, "a.html");
        assert_eq!(hits[1].doc_id, 1);
        assert!(hits[0].score > hits[1].score);
        assert_eq!(
            hits[0].matched_terms.get("polyglot"),
            Some(&BTreeSet::from(["body".to_string()]))
        );
        assert_eq!(hits[1].teaser.as_deref(), Some("polyglot teams"));
    }

    #[test]
    fn test_title_boost() {
        let index = build(
            vec![
                page("a.html", "Overview", "caching explained"),
                page("b.html", "Caching", "overview"),
            ],
            IndexConfig::default(),
        )
        .unwrap()
        .index;

        let hits = search(&index, "caching", &SearchOptions::default());
        assert_eq!(hits[0].doc_id, 1);

        let options = SearchOptions::default()
            .with_boost("title", 0.0)
            .with_boost("breadcrumbs", 0.0);
        let hits = search(&index, "caching", &options);
        assert_eq!(hits[0].doc_id, 0);
    }

    #[test]
    fn test_teaser_prefers_longest_matching_field() {
        let index = build(
            vec![page(
                "a.html",
                "Workspace",
                "A workspace groups every project of the repository.",
            )],
            IndexConfig::default(),
        )
        .unwrap()
        .index;

        let hits = search(&index, "workspace", &SearchOptions::default());
        assert_eq!(
            hits[0].teaser.as_deref(),
            Some("A workspace groups every project of the repository.")
        );

        let options = SearchOptions::default().with_fields(vec!["title"]);
        let hits = search(&index, "workspace", &options);
        assert_eq!(hits[0].teaser.as_deref(), Some("Workspace"));
    }

    #[test]
    fn test_no_teaser_without_stored_text() {
        let index = build(
            vec![page("a.html", "Toolchains", "Toolchains are fetched on demand.")],
            IndexConfig::default().with_save(false),
        )
        .unwrap()
        .index;

        let hits = search(&index, "toolchains", &SearchOptions::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].teaser, None);
    }

    #[test]
    fn test_exact_match_outranks_expansion() {
        let index = build(
            vec![page("a.html", "One", "builder"), page("b.html", "Two", "build")],
            IndexConfig::default(),
        )
        .unwrap()
        .index;

        let hits = search(&index, "build", &SearchOptions::default());
        let ids: Vec<_> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert!(hits[1].matched_terms.contains_key("builder"));
    }
}
