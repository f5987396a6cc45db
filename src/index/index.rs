//! The immutable in-memory index.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::pipeline::Pipeline;
use crate::error::Result;
use crate::index::document::DocId;
use crate::index::trie::PostingsTrie;

/// Raw field text kept for a document, keyed by field name. Includes the
/// ref field with the document id as a string.
pub type StoredDocument = BTreeMap<String, String>;

/// Per-document bookkeeping: field lengths and, optionally, stored text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentStore {
    pub(crate) doc_info: BTreeMap<DocId, BTreeMap<String, usize>>,
    pub(crate) docs: BTreeMap<DocId, Option<StoredDocument>>,
    pub(crate) save: bool,
}

impl DocumentStore {
    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.doc_info.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.doc_info.is_empty()
    }

    /// Whether raw field text is stored.
    pub fn save(&self) -> bool {
        self.save
    }

    /// Token counts per field, by document.
    pub fn doc_info(&self) -> &BTreeMap<DocId, BTreeMap<String, usize>> {
        &self.doc_info
    }

    /// Stored documents by id; `None` entries when saving is off.
    pub fn docs(&self) -> &BTreeMap<DocId, Option<StoredDocument>> {
        &self.docs
    }

    /// Whether `doc_id` is in the store.
    pub fn contains(&self, doc_id: DocId) -> bool {
        self.doc_info.contains_key(&doc_id)
    }

    /// Token count of `field` in `doc_id` after the pipeline.
    pub fn field_length(&self, doc_id: DocId, field: &str) -> usize {
        self.doc_info
            .get(&doc_id)
            .and_then(|info| info.get(field))
            .copied()
            .unwrap_or(0)
    }

    /// Stored document for `doc_id`, if saving was on.
    pub fn stored(&self, doc_id: DocId) -> Option<&StoredDocument> {
        self.docs.get(&doc_id).and_then(Option::as_ref)
    }
}

/// Statistics for one indexed field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldStats {
    /// Field name.
    pub name: String,
    /// Number of distinct tokens in the field trie.
    pub unique_tokens: usize,
    /// Sum of the field's token counts over all documents.
    pub total_tokens: usize,
    /// Mean token count per document.
    pub average_length: f64,
}

/// Summary statistics for an index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexStats {
    /// Number of documents.
    pub doc_count: usize,
    /// Length of `doc_urls`.
    pub url_slots: usize,
    /// Per-field statistics, in index order.
    pub fields: Vec<FieldStats>,
    /// Pipeline stage names.
    pub pipeline: Vec<String>,
    /// Index format version.
    pub version: String,
}

/// Components of an [`Index`], assembled by the builder or the loader.
pub(crate) struct IndexParts {
    pub doc_urls: Vec<String>,
    pub document_store: DocumentStore,
    pub fields: Vec<String>,
    pub tries: Vec<PostingsTrie>,
    pub pipeline: Vec<String>,
    pub lang: String,
    pub ref_field: String,
    pub version: String,
}

/// A built search index.
///
/// Immutable once constructed, so it can be shared between any number of
/// concurrent queries behind an `Arc` with no locking.
#[derive(Clone, Debug)]
pub struct Index {
    doc_urls: Vec<String>,
    document_store: DocumentStore,
    fields: Vec<String>,
    tries: Vec<PostingsTrie>,
    pipeline: Pipeline,
    pipeline_names: Vec<String>,
    lang: String,
    ref_field: String,
    version: String,
}

impl Index {
    pub(crate) fn from_parts(parts: IndexParts) -> Result<Self> {
        let pipeline = Pipeline::from_names(&parts.pipeline)?;
        Ok(Index {
            doc_urls: parts.doc_urls,
            document_store: parts.document_store,
            fields: parts.fields,
            tries: parts.tries,
            pipeline,
            pipeline_names: parts.pipeline,
            lang: parts.lang,
            ref_field: parts.ref_field,
            version: parts.version,
        })
    }

    /// Number of distinct documents.
    pub fn doc_count(&self) -> usize {
        self.document_store.len()
    }

    /// Check if the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.document_store.is_empty()
    }

    /// Urls by document id; unused positions are empty strings.
    pub fn doc_urls(&self) -> &[String] {
        &self.doc_urls
    }

    /// Url of `doc_id`.
    pub fn doc_url(&self, doc_id: DocId) -> Option<&str> {
        self.doc_urls.get(doc_id as usize).map(String::as_str)
    }

    /// The document store.
    pub fn document_store(&self) -> &DocumentStore {
        &self.document_store
    }

    /// Indexed field names, in index order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Position of `field` in index order.
    pub fn field_position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Postings trie of `field`.
    pub fn trie(&self, field: &str) -> Option<&PostingsTrie> {
        self.field_position(field).map(|i| &self.tries[i])
    }

    /// Field names paired with their tries, in index order.
    pub fn tries(&self) -> impl Iterator<Item = (&str, &PostingsTrie)> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.tries.iter())
    }

    /// Token count of `field` in `doc_id`.
    pub fn field_length(&self, doc_id: DocId, field: &str) -> usize {
        self.document_store.field_length(doc_id, field)
    }

    /// Stored raw text of `field` in `doc_id`.
    pub fn stored_text(&self, doc_id: DocId, field: &str) -> Option<&str> {
        self.document_store
            .stored(doc_id)
            .and_then(|doc| doc.get(field))
            .map(String::as_str)
    }

    /// The pipeline this index was built with; queries must use the same one.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Pipeline stage names.
    pub fn pipeline_names(&self) -> &[String] {
        &self.pipeline_names
    }

    /// Language tag.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Reference field name.
    pub fn ref_field(&self) -> &str {
        &self.ref_field
    }

    /// Index format version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Summary statistics.
    pub fn stats(&self) -> IndexStats {
        let doc_count = self.doc_count();
        let fields = self
            .tries()
            .map(|(name, trie)| {
                let total_tokens: usize = self
                    .document_store
                    .doc_info
                    .values()
                    .filter_map(|info| info.get(name))
                    .sum();
                let average_length = if doc_count == 0 {
                    0.0
                } else {
                    total_tokens as f64 / doc_count as f64
                };
                FieldStats {
                    name: name.to_string(),
                    unique_tokens: trie.token_count(),
                    total_tokens,
                    average_length,
                }
            })
            .collect();

        IndexStats {
            doc_count,
            url_slots: self.doc_urls.len(),
            fields,
            pipeline: self.pipeline_names.clone(),
            version: self.version.clone(),
        }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.doc_urls == other.doc_urls
            && self.document_store == other.document_store
            && self.fields == other.fields
            && self.tries == other.tries
            && self.pipeline_names == other.pipeline_names
            && self.lang == other.lang
            && self.ref_field == other.ref_field
            && self.version == other.version
    }
}
