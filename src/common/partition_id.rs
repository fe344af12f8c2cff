//! Partition identifier type.

use std::fmt;

/// Identifies one of the fixed storage partitions.
///
/// Partitions stand in for a sharded durable store: deep tree nodes are
/// hashed into one of `num_partitions` buckets addressed only by this
/// index. The core never touches the storage medium behind a partition.
///
/// # Example
/// ```
/// use tiertree::PartitionId;
///
/// let pid = PartitionId::new(3);
/// assert_eq!(pid.0, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionId(pub usize);

impl PartitionId {
    /// Create a new PartitionId.
    #[inline]
    pub fn new(id: usize) -> Self {
        PartitionId(id)
    }

    /// The raw bucket index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partition({})", self.0)
    }
}
