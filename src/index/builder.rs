//! Index construction.
//!
//! Documents are analyzed in parallel with rayon; the resulting token counts
//! are merged sequentially in insertion order, so two builds over the same
//! input always produce the same index.

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::pipeline::Pipeline;
use crate::error::{GlaiveError, Result};
use crate::index::config::{INDEX_VERSION, IndexConfig};
use crate::index::document::{DocId, Document};
use crate::index::index::{DocumentStore, Index, IndexParts, StoredDocument};
use crate::index::trie::PostingsTrie;

/// Raised when a document id is added a second time.
///
/// The later document's url, stored text and field lengths replace the
/// earlier ones; postings of both documents stay merged under the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateDocumentWarning {
    /// The repeated id.
    pub id: DocId,
    /// Url of the document that was overwritten.
    pub previous_url: String,
    /// Url of the document that replaced it.
    pub url: String,
}

impl fmt::Display for DuplicateDocumentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate document id {}: `{}` replaces `{}`, postings merged",
            self.id, self.url, self.previous_url
        )
    }
}

/// Result of a build: the index plus any recoverable warnings.
#[derive(Debug)]
pub struct BuildOutput {
    /// The built index.
    pub index: Index,
    /// Duplicate-id warnings, in the order they were raised.
    pub warnings: Vec<DuplicateDocumentWarning>,
}

/// Token counts of one document, per configured field.
struct AnalyzedDocument {
    id: DocId,
    url: String,
    stored: Option<StoredDocument>,
    lengths: Vec<usize>,
    counts: Vec<AHashMap<String, u32>>,
}

/// Accumulates documents and produces an [`Index`].
#[derive(Debug)]
pub struct IndexBuilder {
    config: IndexConfig,
    pipeline: Pipeline,
    documents: Vec<Document>,
    urls: AHashMap<DocId, String>,
    next_id: DocId,
    warnings: Vec<DuplicateDocumentWarning>,
}

impl IndexBuilder {
    /// Create a builder. The configuration is validated here, before any
    /// document is accepted.
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = config.build_pipeline()?;
        Ok(IndexBuilder {
            config,
            pipeline,
            documents: Vec::new(),
            urls: AHashMap::new(),
            next_id: 0,
            warnings: Vec::new(),
        })
    }

    /// The build configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of documents added so far, duplicates included.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents have been added.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Add a document. Documents without an id get the next dense id, one
    /// past the largest id seen so far.
    ///
    /// Ids above [`IndexConfig::max_doc_id`] are rejected, since `doc_urls`
    /// needs a slot for every id up to the largest.
    ///
    /// Returns a warning if the id was already used.
    pub fn add_document(
        &mut self,
        mut document: Document,
    ) -> Result<Option<DuplicateDocumentWarning>> {
        let id = match document.id {
            Some(id) => id,
            None => {
                let id = self.next_id;
                document.id = Some(id);
                id
            }
        };
        if id > self.config.max_doc_id || id == DocId::MAX {
            return Err(GlaiveError::invalid_argument(format!(
                "document id {id} is out of range (largest accepted id is {})",
                self.config.max_doc_id.min(DocId::MAX - 1)
            )));
        }
        self.next_id = self.next_id.max(id + 1);

        let warning = self
            .urls
            .insert(id, document.url.clone())
            .map(|previous_url| DuplicateDocumentWarning {
                id,
                previous_url,
                url: document.url.clone(),
            });
        if let Some(warning) = &warning {
            warn!("{warning}");
            self.warnings.push(warning.clone());
        }

        self.documents.push(document);
        Ok(warning)
    }

    /// Add a document under the next dense id, ignoring any id it carries.
    pub fn push(&mut self, mut document: Document) -> Result<DocId> {
        document.id = None;
        self.add_document(document)?;
        Ok(self.next_id - 1)
    }

    /// Add every document in `documents`.
    pub fn extend<I>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = Document>,
    {
        for document in documents {
            self.add_document(document)?;
        }
        Ok(())
    }

    fn analyze(&self, document: &Document) -> AnalyzedDocument {
        let id = document.id.unwrap_or_default();
        let mut lengths = Vec::with_capacity(self.config.fields.len());
        let mut counts = Vec::with_capacity(self.config.fields.len());

        for field in &self.config.fields {
            let mut field_counts: AHashMap<String, u32> = AHashMap::new();
            let mut length = 0;
            for token in self.pipeline.tokenize(document.field(&field.name)) {
                *field_counts.entry(token.text).or_insert(0) += 1;
                length += 1;
            }
            lengths.push(length);
            counts.push(field_counts);
        }

        if self.config.carry_field_tokens {
            for i in 1..counts.len() {
                let (before, after) = counts.split_at_mut(i);
                for (token, count) in &before[i - 1] {
                    *after[0].entry(token.clone()).or_insert(0) += count;
                }
            }
        }

        let stored = self.config.save.then(|| {
            let mut stored: StoredDocument = self
                .config
                .fields
                .iter()
                .map(|f| (f.name.clone(), document.field(&f.name).to_string()))
                .collect();
            stored.insert(self.config.ref_field.clone(), id.to_string());
            stored
        });

        AnalyzedDocument {
            id,
            url: document.url.clone(),
            stored,
            lengths,
            counts,
        }
    }

    /// Analyze all documents and assemble the index.
    pub fn finish(self) -> Result<BuildOutput> {
        let analyzed: Vec<AnalyzedDocument> = self
            .documents
            .par_iter()
            .map(|document| self.analyze(document))
            .collect();

        let fields = self.config.field_names();
        let mut raw: Vec<BTreeMap<String, BTreeMap<DocId, u32>>> =
            vec![BTreeMap::new(); fields.len()];
        let mut doc_urls: Vec<String> = Vec::new();
        let mut store = DocumentStore {
            save: self.config.save,
            ..Default::default()
        };

        for document in analyzed {
            let slot = document.id as usize;
            if doc_urls.len() <= slot {
                doc_urls.resize(slot + 1, String::new());
            }
            doc_urls[slot] = document.url;

            let info = fields
                .iter()
                .cloned()
                .zip(document.lengths.iter().copied())
                .collect();
            store.doc_info.insert(document.id, info);
            store.docs.insert(document.id, document.stored);

            for (field_postings, counts) in raw.iter_mut().zip(document.counts) {
                for (token, count) in counts {
                    *field_postings
                        .entry(token)
                        .or_default()
                        .entry(document.id)
                        .or_insert(0) += count;
                }
            }
        }

        let tries: Vec<PostingsTrie> = raw
            .into_iter()
            .zip(&fields)
            .map(|(postings, field)| {
                let mut trie = PostingsTrie::new();
                for (token, docs) in postings {
                    let weights = docs
                        .into_iter()
                        .map(|(id, count)| (id, term_frequency(count)))
                        .collect();
                    trie.insert_postings(&token, weights);
                }
                debug!(
                    "Field `{field}`: {} tokens, {} trie nodes",
                    trie.token_count(),
                    trie.node_count()
                );
                trie
            })
            .collect();

        let index = Index::from_parts(IndexParts {
            doc_urls,
            document_store: store,
            fields,
            tries,
            pipeline: self.config.pipeline.clone(),
            lang: self.config.lang.clone(),
            ref_field: self.config.ref_field.clone(),
            version: INDEX_VERSION.to_string(),
        })?;

        info!(
            "Built index: {} documents, {} fields, {} duplicate ids",
            index.doc_count(),
            index.fields().len(),
            self.warnings.len()
        );

        Ok(BuildOutput {
            index,
            warnings: self.warnings,
        })
    }
}

/// Weight of a token occurring `count` times in a field.
pub fn term_frequency(count: u32) -> f64 {
    (count as f64).sqrt()
}

/// Build an index from `documents` in one call.
pub fn build<I>(documents: I, config: IndexConfig) -> Result<BuildOutput>
where
    I: IntoIterator<Item = Document>,
{
    let mut builder = IndexBuilder::new(config)?;
    builder.extend(documents)?;
    builder.finish()
}
