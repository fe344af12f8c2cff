//! Lock-wrapped tree for multi-threaded callers.
//!
//! The tree itself is single-writer (`&mut self`). Surrounding systems
//! that need shared access get the recommended discipline packaged up:
//! an exclusive lock for the duration of any insertion, a shared lock
//! for classification and lookups. Classification copies keys rather
//! than sharing structure, so a report stays valid after the lock is
//! released.

use parking_lot::RwLock;

use crate::common::{Result, TreeConfig};
use crate::index::btree::{BufferedBTree, TierReport, TreeStats};
use crate::partition::PartitionKey;

/// A [`BufferedBTree`] behind a [`parking_lot::RwLock`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tiertree::index::SharedTree;
/// use tiertree::TreeConfig;
///
/// let tree = Arc::new(SharedTree::<i64>::new(TreeConfig::default()).unwrap());
/// tree.insert(42);
/// assert!(tree.contains(&42));
/// ```
#[derive(Debug)]
pub struct SharedTree<K> {
    inner: RwLock<BufferedBTree<K>>,
}

impl<K: Ord> SharedTree<K> {
    /// Create an empty shared tree.
    ///
    /// # Errors
    /// Same validation as [`BufferedBTree::new`].
    pub fn new(config: TreeConfig) -> Result<Self> {
        Ok(Self {
            inner: RwLock::new(BufferedBTree::new(config)?),
        })
    }

    /// Insert a key under the write lock.
    pub fn insert(&self, key: K) {
        self.inner.write().insert(key);
    }

    /// Drain all write buffers under the write lock.
    pub fn flush_pending(&self) {
        self.inner.write().flush_pending();
    }

    /// Whether `key` was inserted (committed or pending).
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Total keys in the index, committed and pending.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copy of the lifetime counters.
    pub fn stats(&self) -> TreeStats {
        *self.inner.read().stats()
    }
}

impl<K: Ord + Clone + PartitionKey> SharedTree<K> {
    /// Run a classification walk under the read lock.
    ///
    /// Concurrent readers proceed; writers wait until the walk's
    /// snapshot is complete.
    pub fn classify_and_route(&self) -> TierReport<K> {
        self.inner.read().classify_and_route()
    }
}
