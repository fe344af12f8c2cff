//! Insertion statistics tracking.
//!
//! The whole point of write buffering is amortizing split cost, so the
//! tree counts splits, deferred keys and flushes. Counters are plain
//! integers — the tree is single-writer (`&mut self`), so there is
//! nothing to synchronize.

use std::fmt;

/// Counters accumulated by a [`crate::index::BufferedBTree`] over its
/// lifetime.
///
/// # Example
/// ```
/// use tiertree::index::BufferedBTree;
/// use tiertree::TreeConfig;
///
/// let mut tree = BufferedBTree::new(TreeConfig::default()).unwrap();
/// for key in 0i64..100 {
///     tree.insert(key);
/// }
/// assert_eq!(tree.stats().inserts, 100);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Keys accepted through the public insert entry point.
    pub inserts: u64,

    /// Node splits, including root splits.
    pub node_splits: u64,

    /// Root splits; each one grows the tree height by exactly 1.
    pub root_splits: u64,

    /// Keys that were parked in a write buffer instead of forcing an
    /// immediate split.
    pub keys_buffered: u64,

    /// Buffer drains; each one pairs a batch of deferred keys with a
    /// single split.
    pub buffer_flushes: u64,
}

impl TreeStats {
    /// Create a stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, splits: {} ({} root), buffered: {}, flushes: {} }}",
            self.inserts, self.node_splits, self.root_splits, self.keys_buffered, self.buffer_flushes
        )
    }
}
