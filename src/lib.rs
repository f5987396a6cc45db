//! # Glaive
//!
//! Build and query the full-text search indexes that static documentation
//! sites ship next to their pages.
//!
//! ## Features
//!
//! - `trimmer → stopWordFilter → stemmer` English token pipeline, shared by
//!   indexing and querying
//! - Per-field postings tries with square-root term frequency weighting
//! - TF-IDF ranking with field boosts, prefix expansion and AND/OR modes
//! - Teasers cut from stored text
//! - Reads and writes the `searchindex.json` / `searchindex.js` layout
//!
//! ```
//! use glaive::index::{Document, IndexConfig, build};
//! use glaive::search::{SearchOptions, search};
//!
//! let docs = vec![
//!     Document::builder()
//!         .url("introduction.html#goals")
//!         .title("Goals")
//!         .body("Fast, correct builds for polyglot monorepos.")
//!         .breadcrumbs("Introduction » Goals")
//!         .build(),
//! ];
//! let index = build(docs, IndexConfig::default()).unwrap().index;
//!
//! let hits = search(&index, "building monorepos", &SearchOptions::default());
//! assert_eq!(hits[0].url, "introduction.html#goals");
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod index;
pub mod search;

pub mod prelude {
    pub use crate::error::{GlaiveError, Result};
    pub use crate::index::{Document, Index, IndexConfig, SearchIndexFile, build};
    pub use crate::search::{IndexHandle, SearchHit, SearchOptions, search};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
