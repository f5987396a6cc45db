//! An owned, swappable reference to the current index.

use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::index::Index;
use crate::search::engine::{self, SearchHit};
use crate::search::options::SearchOptions;

/// Shared handle to the index queries should run against.
///
/// Rebuilding never mutates an index in place: a new index is built and
/// swapped in with [`IndexHandle::replace`]. Searches that already took a
/// snapshot keep the old index alive until they finish. The lock is held
/// only long enough to clone an `Arc`.
#[derive(Clone, Debug)]
pub struct IndexHandle {
    current: Arc<RwLock<Arc<Index>>>,
}

impl IndexHandle {
    /// Create a handle serving `index`.
    pub fn new(index: Index) -> Self {
        IndexHandle {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// Snapshot of the current index.
    pub fn current(&self) -> Arc<Index> {
        Arc::clone(&self.current.read())
    }

    /// Swap in `index`, returning the one it replaces.
    pub fn replace(&self, index: Index) -> Arc<Index> {
        let index = Arc::new(index);
        let previous = std::mem::replace(&mut *self.current.write(), index);
        info!(
            "Replaced index: {} -> {} documents",
            previous.doc_count(),
            self.current().doc_count()
        );
        previous
    }

    /// Search the current index.
    pub fn search(&self, text: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let index = self.current();
        engine::search(&index, text, options)
    }
}

impl From<Index> for IndexHandle {
    fn from(index: Index) -> Self {
        IndexHandle::new(index)
    }
}
