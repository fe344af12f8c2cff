//! Buffered B-tree with depth-based partition tiering.
//!
//! # Components
//! - [`BufferedBTree`] - the tree: root ownership, insertion entry
//!   point, classification walk
//! - [`Node`](node::Node) - key storage, splits, write buffers
//! - [`TierReport`] / [`NodeSnapshot`] / [`PartitionTable`] - pure
//!   classification output
//! - [`SharedTree`] - lock-wrapped tree for multi-threaded callers
//! - [`TreeStats`] - split/buffer accounting

mod node;
mod shared;
mod stats;
mod tiering;

use std::collections::VecDeque;
use std::mem;

use crate::common::{Result, TreeConfig};
use crate::partition::{PartitionKey, PartitionRouter};

use node::Node;

pub use shared::SharedTree;
pub use stats::TreeStats;
pub use tiering::{NodeSnapshot, PartitionTable, TierReport};

/// A self-balancing ordered index over a multiset of keys.
///
/// Classic B-tree balance (all leaves at one depth, every non-root node
/// holding `t-1..=2t-1` keys) with two twists:
///
/// 1. **Deferred splits.** Under [`SplitPolicy::Buffered`], a full
///    internal node on the insertion path accumulates incoming keys in
///    a write buffer; one split is amortized over `2t - 1` deferred
///    insertions.
/// 2. **Depth tiering.** [`classify_and_route`](Self::classify_and_route)
///    walks the tree once and classifies every node: shallow levels stay
///    resident, deeper nodes are hashed into fixed storage partitions.
///
/// The two features are independent; any split policy composes with any
/// tiering threshold.
///
/// # Example
/// ```
/// use tiertree::index::BufferedBTree;
/// use tiertree::TreeConfig;
///
/// let mut tree = BufferedBTree::new(TreeConfig::new(3, 4, 2)).unwrap();
/// for key in [10i64, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
/// assert_eq!(tree.in_order_keys(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
///
/// let report = tree.classify_and_route();
/// assert_eq!(report.node_count(), 3); // root + 2 leaves, all resident
/// ```
///
/// [`SplitPolicy::Buffered`]: crate::common::SplitPolicy::Buffered
#[derive(Debug)]
pub struct BufferedBTree<K> {
    /// Replaced with a fresh internal node whenever the old root is
    /// full at the start of an insertion — the only way height grows.
    root: Node<K>,
    config: TreeConfig,
    stats: TreeStats,
}

impl<K: Ord> BufferedBTree<K> {
    /// Create an empty tree.
    ///
    /// # Errors
    /// Fails fast on invalid configuration (`t < 2`, zero partitions,
    /// zero in-memory levels).
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: Node::new(true),
            config,
            stats: TreeStats::new(),
        })
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Lifetime insertion/split/buffer counters.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Insert a key. Duplicates are accepted and kept adjacent.
    ///
    /// If the root is full, a new root adopts it as sole child and
    /// splits it before the key is delegated — the root never buffers,
    /// so height growth is always immediate and at most 1 per call.
    pub fn insert(&mut self, key: K) {
        self.stats.inserts += 1;

        if self.root.is_full(&self.config) {
            let old_root = mem::replace(&mut self.root, Node::new(false));
            self.root.children.push(old_root);
            self.root.split_child(0, &self.config, &mut self.stats);
            self.stats.root_splits += 1;
        }

        self.root.insert_non_full(key, 1, &self.config, &mut self.stats);
    }

    /// Whether `key` was inserted, counting keys still pending in
    /// write buffers.
    pub fn contains(&self, key: &K) -> bool {
        self.root.contains(key)
    }

    /// Total keys in the index, committed and pending.
    pub fn len(&self) -> usize {
        self.committed_len() + self.pending_len()
    }

    /// Whether the index holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys sitting in node key slots.
    pub fn committed_len(&self) -> usize {
        self.root.committed_len()
    }

    /// Keys still deferred in write buffers.
    pub fn pending_len(&self) -> usize {
        self.root.pending_len()
    }

    /// Number of levels, root = 1. An empty tree has height 1.
    ///
    /// All leaves sit at the same depth, so following the leftmost
    /// spine is enough.
    pub fn height(&self) -> usize {
        let mut node = &self.root;
        let mut height = 1;
        while !node.is_leaf {
            node = &node.children[0];
            height += 1;
        }
        height
    }

    /// Drain every write buffer in the tree, committing all deferred
    /// keys into key slots.
    ///
    /// Flushing a buffer splits its node, which can promote keys
    /// upward and re-buffer deferred keys one level deeper, so this
    /// loops until no buffer holds a key. Each pass splits the root
    /// first if it is full, preserving the headroom the flush descent
    /// relies on.
    pub fn flush_pending(&mut self) {
        while self.root.pending_len() > 0 {
            if self.root.is_full(&self.config) {
                let old_root = mem::replace(&mut self.root, Node::new(false));
                self.root.children.push(old_root);
                self.root.split_child(0, &self.config, &mut self.stats);
                self.stats.root_splits += 1;
            }
            if !self.root.flush_one(1, &self.config, &mut self.stats) {
                break;
            }
        }
    }
}

impl<K: Ord + Clone> BufferedBTree<K> {
    /// All committed keys in non-decreasing order.
    pub fn in_order_keys(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.committed_len());
        self.root.collect_in_order(&mut out);
        out
    }
}

impl<K: Ord + Clone + PartitionKey> BufferedBTree<K> {
    /// Classify every node by depth and route deep nodes to partitions.
    ///
    /// One breadth-first walk, root first. Nodes at levels up to the
    /// configured `max_in_memory_level` are snapshotted into the
    /// resident tier in visit order; deeper nodes have their key
    /// sequence hashed to a partition bucket. Children are always
    /// descended into regardless of their parent's tier, so every node
    /// of the tree is classified exactly once.
    ///
    /// Read-only: the walk copies keys and never reshapes the tree.
    /// Inserting after a walk invalidates the report; run it again.
    pub fn classify_and_route(&self) -> TierReport<K> {
        let router = PartitionRouter::new(self.config.num_partitions);
        let mut report = TierReport {
            in_memory: Vec::new(),
            partitions: PartitionTable::new(self.config.num_partitions),
        };

        let mut queue: VecDeque<(&Node<K>, usize)> = VecDeque::new();
        queue.push_back((&self.root, 1));

        while let Some((node, level)) = queue.pop_front() {
            if level <= self.config.max_in_memory_level {
                report.in_memory.push(NodeSnapshot {
                    keys: node.keys.clone(),
                    is_leaf: node.is_leaf,
                    level,
                });
            } else {
                let partition = router.route(&node.keys);
                report.partitions.push(partition, node.keys.clone());
            }
            for child in &node.children {
                queue.push_back((child, level + 1));
            }
        }

        report
    }
}

#[cfg(test)]
impl<K: Ord + std::fmt::Debug> BufferedBTree<K> {
    /// Walk the whole tree asserting the structural invariants:
    /// sorted keys, separator bounds, key-count bounds, child counts,
    /// uniform leaf depth, and buffers only on full internal nodes.
    fn assert_invariants(&self) {
        fn check<K: Ord + std::fmt::Debug>(
            node: &Node<K>,
            config: &TreeConfig,
            is_root: bool,
            depth: usize,
            lower: Option<&K>,
            upper: Option<&K>,
            leaf_depth: &mut Option<usize>,
        ) {
            assert!(
                node.keys.windows(2).all(|w| w[0] <= w[1]),
                "keys out of order: {:?}",
                node.keys
            );
            assert!(
                node.keys.len() <= config.max_keys(),
                "node over capacity: {:?}",
                node.keys
            );
            if !is_root {
                assert!(
                    node.keys.len() >= config.min_keys(),
                    "non-root node under-filled: {:?}",
                    node.keys
                );
            }
            if let (Some(lo), Some(first)) = (lower, node.keys.first()) {
                assert!(lo <= first, "separator bound violated below {lo:?}");
            }
            if let (Some(hi), Some(last)) = (upper, node.keys.last()) {
                assert!(last <= hi, "separator bound violated above {hi:?}");
            }
            if !node.buffer.is_empty() {
                assert!(!node.is_leaf, "leaf carries a buffer");
                assert!(
                    node.keys.len() == config.max_keys(),
                    "buffer on a non-full node"
                );
            }

            if node.is_leaf {
                assert!(node.children.is_empty());
                match leaf_depth {
                    Some(d) => assert_eq!(*d, depth, "leaves at differing depths"),
                    None => *leaf_depth = Some(depth),
                }
            } else {
                assert_eq!(node.children.len(), node.keys.len() + 1);
                for (i, child) in node.children.iter().enumerate() {
                    let lo = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
                    let hi = node.keys.get(i).or(upper);
                    check(child, config, false, depth + 1, lo, hi, leaf_depth);
                }
            }
        }

        let mut leaf_depth = None;
        check(
            &self.root,
            &self.config,
            true,
            1,
            None,
            None,
            &mut leaf_depth,
        );
    }
}
