//! Index module for Glaive.
//!
//! This module covers everything on the build side: the document and
//! configuration types, the postings trie, the builder that turns documents
//! into an immutable [`Index`], and reading and writing index files.

pub mod builder;
pub mod config;
pub mod document;
#[allow(clippy::module_inception)]
pub mod index;
pub mod persist;
pub mod trie;

// Re-export commonly used types
pub use builder::{BuildOutput, DuplicateDocumentWarning, IndexBuilder, build};
pub use config::{FieldConfig, INDEX_VERSION, IndexConfig};
pub use document::{DocId, Document, DocumentBuilder};
pub use index::{DocumentStore, FieldStats, Index, IndexStats, StoredDocument};
pub use persist::{FileFormat, SearchIndexFile};
pub use trie::{PostingsTrie, TrieNode};
