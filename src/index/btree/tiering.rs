//! Tiering output: node snapshots, partition buckets, and the report
//! produced by a classification walk.
//!
//! The walk itself lives on [`crate::index::BufferedBTree`]; this module
//! holds the pure data it emits. Nothing here references live tree
//! nodes — snapshots are key copies, safe to hand to storage backends
//! or to keep after further inserts invalidate the classification.

use std::fmt;

use crate::common::{PartitionId, Result};
use crate::partition::PartitionStore;

/// A copy of one resident node: its keys and whether it is a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot<K> {
    /// The node's committed keys, in order.
    pub keys: Vec<K>,

    /// Whether the node was a leaf.
    pub is_leaf: bool,

    /// The node's level (root = 1).
    pub level: usize,
}

impl<K: fmt::Debug> fmt::Display for NodeSnapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_leaf { "leaf" } else { "internal" };
        write!(f, "L{} {} {:?}", self.level, kind, self.keys)
    }
}

/// Per-partition buckets of node key-snapshots.
///
/// Bucket `i` holds the key sequences of every deep node the router
/// hashed to partition `i`, in the order the classification walk
/// visited them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable<K> {
    buckets: Vec<Vec<Vec<K>>>,
}

impl<K> PartitionTable<K> {
    /// Create an empty table with `num_partitions` buckets.
    pub(crate) fn new(num_partitions: usize) -> Self {
        Self {
            buckets: (0..num_partitions).map(|_| Vec::new()).collect(),
        }
    }

    /// Append a node key-snapshot to its assigned bucket.
    pub(crate) fn push(&mut self, partition: PartitionId, keys: Vec<K>) {
        self.buckets[partition.index()].push(keys);
    }

    /// Number of partitions.
    pub fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    /// The snapshots assigned to one partition.
    ///
    /// # Panics
    /// Panics if `partition` is out of range for this table.
    pub fn bucket(&self, partition: PartitionId) -> &[Vec<K>] {
        &self.buckets[partition.index()]
    }

    /// Iterate over `(partition, snapshots)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PartitionId, &[Vec<K>])> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| (PartitionId::new(i), b.as_slice()))
    }

    /// Total node snapshots across all buckets.
    pub fn node_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// The result of one classification walk over the tree.
///
/// Every node of the tree appears exactly once: either as a resident
/// snapshot in `in_memory` (levels at or above the configured
/// threshold, breadth order, root first) or as a key-snapshot in one
/// partition bucket. Further inserts invalidate the report; re-run the
/// walk before trusting it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierReport<K> {
    /// Resident-tier snapshots, breadth order, root first.
    pub in_memory: Vec<NodeSnapshot<K>>,

    /// Deep-node key snapshots, bucketed by partition.
    pub partitions: PartitionTable<K>,
}

impl<K> TierReport<K> {
    /// Total nodes classified, across both tiers.
    pub fn node_count(&self) -> usize {
        self.in_memory.len() + self.partitions.node_count()
    }

    /// Hand every partition bucket to a storage backend.
    ///
    /// The core never performs durable I/O itself; this is the glue
    /// that walks the buckets in partition order and pushes each
    /// snapshot to the caller's [`PartitionStore`].
    pub fn write_to<S: PartitionStore<K>>(&self, store: &mut S) -> Result<()> {
        for (partition, snapshots) in self.partitions.iter() {
            for keys in snapshots {
                store.write_bucket(partition, keys)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_table_push_and_bucket() {
        let mut table: PartitionTable<i64> = PartitionTable::new(3);
        table.push(PartitionId::new(1), vec![10, 20]);
        table.push(PartitionId::new(1), vec![30]);
        table.push(PartitionId::new(2), vec![40]);

        assert_eq!(table.num_partitions(), 3);
        assert_eq!(table.bucket(PartitionId::new(0)), &[] as &[Vec<i64>]);
        assert_eq!(
            table.bucket(PartitionId::new(1)),
            &[vec![10, 20], vec![30]]
        );
        assert_eq!(table.node_count(), 3);
    }

    #[test]
    fn test_report_node_count() {
        let mut partitions: PartitionTable<i64> = PartitionTable::new(2);
        partitions.push(PartitionId::new(0), vec![1]);

        let report = TierReport {
            in_memory: vec![NodeSnapshot {
                keys: vec![5],
                is_leaf: false,
                level: 1,
            }],
            partitions,
        };
        assert_eq!(report.node_count(), 2);
    }

    #[test]
    fn test_snapshot_display() {
        let snap = NodeSnapshot {
            keys: vec![5, 9],
            is_leaf: true,
            level: 3,
        };
        assert_eq!(format!("{}", snap), "L3 leaf [5, 9]");
    }
}
