//! Query construction.
//!
//! Query text goes through the index's own pipeline, so a query is always
//! normalized exactly the way the indexed text was. Each distinct token
//! becomes an exact clause; with expansion on, every other indexed token that
//! starts with it becomes an additional, down-weighted clause.

use std::collections::BTreeSet;

use log::debug;

use crate::index::Index;
use crate::search::options::{CombineWith, EXPANSION_PENALTY, SearchOptions};

/// One term to look up in the field tries.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    /// Normalized token looked up in the tries.
    pub term: String,
    /// Position of the query token this clause was derived from.
    pub source: usize,
    /// Multiplier applied to every contribution of this clause.
    pub boost: f64,
    /// Whether the clause came from prefix expansion.
    pub use_prefix: bool,
    /// Whether a document must match the source token to be kept.
    pub required: bool,
}

/// A parsed query: the distinct query tokens, the fields to search, and the
/// clauses to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// Distinct normalized query tokens, in query order.
    pub tokens: Vec<String>,
    /// Fields to search, in index order.
    pub fields: Vec<String>,
    /// Clauses, exact clause first for each token.
    pub clauses: Vec<Clause>,
}

impl Query {
    /// Parse `text` against `index`.
    pub fn parse(index: &Index, text: &str, options: &SearchOptions) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for term in index.pipeline().terms(text) {
            if !tokens.contains(&term) {
                tokens.push(term);
            }
        }

        let fields = resolve_fields(index, options);
        let required = options.combine_with == CombineWith::And;

        let mut clauses = Vec::new();
        for (source, token) in tokens.iter().enumerate() {
            clauses.push(Clause {
                term: token.clone(),
                source,
                boost: 1.0,
                use_prefix: false,
                required,
            });

            if options.expand {
                let expansions: BTreeSet<String> = fields
                    .iter()
                    .filter_map(|field| index.trie(field))
                    .flat_map(|trie| trie.expand(token))
                    .filter(|term| term != token)
                    .collect();
                let token_len = token.chars().count() as f64;
                for term in expansions {
                    let boost = EXPANSION_PENALTY * token_len / term.chars().count() as f64;
                    clauses.push(Clause {
                        term,
                        source,
                        boost,
                        use_prefix: true,
                        required,
                    });
                }
            }
        }

        debug!(
            "Query {text:?}: {} tokens, {} clauses over {:?}",
            tokens.len(),
            clauses.len(),
            fields
        );

        Query {
            tokens,
            fields,
            clauses,
        }
    }

    /// Whether nothing survived the pipeline.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Fields in scope, in index order. Unknown names in the options are dropped.
fn resolve_fields(index: &Index, options: &SearchOptions) -> Vec<String> {
    for name in options.boosts.keys() {
        if index.field_position(name).is_none() {
            debug!("Ignoring boost for unknown field `{name}`");
        }
    }

    match &options.fields {
        None => index.fields().to_vec(),
        Some(requested) => {
            for name in requested {
                if index.field_position(name).is_none() {
                    debug!("Ignoring unknown field `{name}`");
                }
            }
            index
                .fields()
                .iter()
                .filter(|field| requested.contains(field))
                .cloned()
                .collect()
        }
    }
}
