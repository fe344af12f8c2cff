//! B-tree node: bounded key storage, child ownership, and local splits.
//!
//! Every node is exclusively owned by its parent (the root by the tree),
//! so splits transplant keys and children into a freshly built sibling
//! instead of juggling shared references.

use std::mem;

use crate::common::config::TreeConfig;
use crate::index::btree::stats::TreeStats;

/// A single B-tree node.
///
/// # Capacity
/// Holds between `t - 1` and `2t - 1` keys (the root may hold fewer).
/// Internal nodes own `keys.len() + 1` children; leaves own none.
///
/// # Write buffer
/// A full internal node at a buffering level accumulates incoming keys
/// in `buffer` instead of forcing an immediate split. The buffer is
/// drained by its parent once `2t - 1` keys are pending. Leaves never
/// buffer: a deferred key would have nowhere to drain except the leaf's
/// own (already full) key slots.
#[derive(Debug)]
pub(crate) struct Node<K> {
    /// Strictly ordered key slots; duplicates sit adjacently.
    pub(crate) keys: Vec<K>,

    /// Owned subtrees, `keys.len() + 1` of them for internal nodes.
    pub(crate) children: Vec<Node<K>>,

    /// Fixed at creation; a leaf never becomes internal or vice versa.
    pub(crate) is_leaf: bool,

    /// Keys pending insertion into this subtree, in arrival order.
    pub(crate) buffer: Vec<K>,
}

impl<K: Ord> Node<K> {
    /// Create an empty node.
    pub(crate) fn new(is_leaf: bool) -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            is_leaf,
            buffer: Vec::new(),
        }
    }

    /// Whether the node has reached its `2t - 1` key capacity.
    #[inline]
    pub(crate) fn is_full(&self, config: &TreeConfig) -> bool {
        self.keys.len() == config.max_keys()
    }

    /// Child slot the key routes to: the number of keys `<= key`.
    ///
    /// Keys equal to a separator route right of it, which keeps
    /// duplicate insertions adjacent to their existing copies.
    #[inline]
    fn child_slot(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Insert `key` into the subtree rooted here.
    ///
    /// `level` is this node's level (root = 1).
    ///
    /// # Contract
    /// The node must have room for one promoted median on entry, or be
    /// guaranteed not to receive one. The tree root bootstrap and the
    /// split/buffer handling of full children establish the first case;
    /// buffer-flush re-application establishes the second (re-applied
    /// keys only descend into the two halves of the just-split child,
    /// which buffer rather than split again at that level). Either way
    /// the node holds at most `2t - 1` keys on return.
    pub(crate) fn insert_non_full(
        &mut self,
        key: K,
        level: usize,
        config: &TreeConfig,
        stats: &mut TreeStats,
    ) {
        if self.is_leaf {
            let pos = self.keys.partition_point(|k| *k <= key);
            self.keys.insert(pos, key);
            return;
        }

        let mut slot = self.child_slot(&key);
        let child_level = level + 1;

        if self.children[slot].is_full(config) {
            let buffers = !self.children[slot].is_leaf
                && config.split_policy.buffers_at(child_level);

            if buffers {
                self.buffer_into_child(slot, key, level, config, stats);
                return;
            }

            // Pre-emptive discipline: split now, then re-resolve the
            // slot against the promoted median.
            self.split_child(slot, config, stats);
            if self.keys[slot] <= key {
                slot += 1;
            }
        }

        self.children[slot].insert_non_full(key, child_level, config, stats);
    }

    /// Defer `key` into the full child's write buffer, flushing the
    /// batch once `2t - 1` keys are pending.
    fn buffer_into_child(
        &mut self,
        slot: usize,
        key: K,
        level: usize,
        config: &TreeConfig,
        stats: &mut TreeStats,
    ) {
        self.children[slot].buffer.push(key);
        stats.keys_buffered += 1;

        if self.children[slot].buffer.len() >= config.buffer_capacity() {
            self.flush_child_buffer(slot, level, config, stats);
        }
    }

    /// Drain the child's buffer: split the child (it holds exactly
    /// `2t - 1` keys, so the split precondition is exact), then re-apply
    /// every pending key through this node.
    ///
    /// Each pending key falls inside the old child's separator range, so
    /// re-application routes only into the two fresh halves. Both halves
    /// are internal nodes at a buffering level, so a half that fills up
    /// mid-drain starts buffering again instead of splitting — this node
    /// gains exactly one key (the promoted median) per flush.
    fn flush_child_buffer(
        &mut self,
        slot: usize,
        level: usize,
        config: &TreeConfig,
        stats: &mut TreeStats,
    ) {
        let pending = mem::take(&mut self.children[slot].buffer);
        self.split_child(slot, config, stats);
        stats.buffer_flushes += 1;

        for key in pending {
            self.insert_non_full(key, level, config, stats);
        }
    }

    /// Split the full child at `slot` around its median key.
    ///
    /// The median (index `t - 1`) moves up into `keys[slot]`; keys
    /// `t..2t-1` and, for internal children, children `t..2t` are
    /// transplanted into a new sibling inserted at `slot + 1`. The
    /// child's pending buffer, if any, must be drained by the caller
    /// beforehand — the buffered keys' target subtree is about to be
    /// cut in half.
    ///
    /// # Panics
    /// Panics if the child is not exactly full. Splitting an underfull
    /// node is a programming error, not a recoverable condition.
    pub(crate) fn split_child(&mut self, slot: usize, config: &TreeConfig, stats: &mut TreeStats) {
        let t = config.min_degree;
        let child = &mut self.children[slot];

        assert!(
            child.keys.len() == config.max_keys(),
            "split_child called on a node with {} keys (expected {})",
            child.keys.len(),
            config.max_keys()
        );
        debug_assert!(child.buffer.is_empty(), "splitting a child with pending keys");

        let mut sibling = Node::new(child.is_leaf);
        sibling.keys = child.keys.split_off(t);
        if !child.is_leaf {
            sibling.children = child.children.split_off(t);
        }
        let median = child.keys.pop().expect("full child has a median key");

        self.keys.insert(slot, median);
        self.children.insert(slot + 1, sibling);
        stats.node_splits += 1;
    }

    /// Whether `key` is present in this subtree, counting keys still
    /// pending in write buffers along the search path.
    pub(crate) fn contains(&self, key: &K) -> bool {
        let mut node = self;
        loop {
            if node.buffer.iter().any(|k| k == key) {
                return true;
            }
            match node.keys.binary_search(key) {
                Ok(_) => return true,
                Err(slot) => {
                    if node.is_leaf {
                        return false;
                    }
                    node = &node.children[slot];
                }
            }
        }
    }

    /// Flush one pending buffer somewhere in this subtree, if any.
    ///
    /// Descends pre-emptively like insertion, but only into subtrees
    /// that actually hold pending keys: a full child on the descent
    /// path is split before descending, so every node receiving a
    /// promoted median has headroom, and at most one split happens
    /// here per call. Returns `true` if a buffer was drained.
    ///
    /// # Contract
    /// The node must not be full on entry (the tree splits a full root
    /// before each pass).
    pub(crate) fn flush_one(
        &mut self,
        level: usize,
        config: &TreeConfig,
        stats: &mut TreeStats,
    ) -> bool {
        if self.is_leaf {
            return false;
        }

        for slot in 0..self.children.len() {
            if !self.children[slot].buffer.is_empty() {
                self.flush_child_buffer(slot, level, config, stats);
                return true;
            }
        }

        let mut slot = 0;
        while slot < self.children.len() {
            if self.children[slot].pending_len() == 0 {
                slot += 1;
                continue;
            }
            if self.children[slot].is_full(config) {
                // Make headroom before descending; flushing below may
                // promote a median into this child. The pending keys
                // may land in either half, so re-check this slot.
                self.split_child(slot, config, stats);
                continue;
            }
            return self.children[slot].flush_one(level + 1, config, stats);
        }
        false
    }

    /// Number of keys committed to key slots in this subtree.
    pub(crate) fn committed_len(&self) -> usize {
        self.keys.len() + self.children.iter().map(Node::committed_len).sum::<usize>()
    }

    /// Number of keys still pending in write buffers in this subtree.
    pub(crate) fn pending_len(&self) -> usize {
        self.buffer.len() + self.children.iter().map(Node::pending_len).sum::<usize>()
    }
}

impl<K: Ord + Clone> Node<K> {
    /// Append this subtree's committed keys to `out` in sorted order.
    pub(crate) fn collect_in_order(&self, out: &mut Vec<K>) {
        if self.is_leaf {
            out.extend(self.keys.iter().cloned());
            return;
        }
        for (i, child) in self.children.iter().enumerate() {
            child.collect_in_order(out);
            if i < self.keys.len() {
                out.push(self.keys[i].clone());
            }
        }
    }
}
