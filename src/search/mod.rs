//! Search module for Glaive.
//!
//! Queries are parsed with the index's own pipeline, scored with TF-IDF over
//! the field tries, collected into a capped, deterministically ordered list,
//! and decorated with teasers cut from stored text.

pub mod collector;
pub mod engine;
pub mod handle;
pub mod options;
pub mod query;
pub mod scorer;
pub mod teaser;

pub use engine::{SearchHit, execute, search};
pub use handle::IndexHandle;
pub use options::{CombineWith, SearchOptions};
pub use query::{Clause, Query};
