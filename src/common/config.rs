//! Tree configuration.
//!
//! All tuning parameters are fixed at construction time and validated
//! eagerly, so a [`crate::index::BufferedBTree`] that exists is always
//! well-configured.

use crate::common::{Error, Result};

/// Smallest legal minimum degree.
///
/// At `t = 2` a node holds between 1 and 3 keys (the classic 2-3-4 tree).
/// Below that a split has no median key to promote.
pub const MIN_DEGREE_FLOOR: usize = 2;

/// Default minimum degree.
///
/// `t = 3` gives nodes of 2..=5 keys — small enough that splits and
/// buffer flushes are exercised by modest workloads.
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Default number of storage partitions.
pub const DEFAULT_NUM_PARTITIONS: usize = 4;

/// Default resident-level threshold (root = level 1).
///
/// Levels 1 and 2 stay in the in-memory tier; everything deeper is
/// routed to a partition.
pub const DEFAULT_MAX_IN_MEMORY_LEVEL: usize = 2;

/// When a full child splits during insertion.
///
/// Splitting and tiering are independent features: either policy can be
/// combined with any `max_in_memory_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Classic pre-emptive B-tree discipline: a full child on the
    /// insertion path is split before descending into it.
    Immediate,

    /// Defer splits for full internal children at or below `min_level`
    /// (root = level 1). Keys headed for such a child accumulate in its
    /// write buffer; once `2t - 1` keys are pending, the child is split
    /// and the batch is re-applied through the parent. One split is
    /// amortized over `2t - 1` insertions.
    ///
    /// Leaves never buffer regardless of level — a buffered key would
    /// have nowhere to drain except the leaf's own key slots.
    Buffered { min_level: usize },
}

impl SplitPolicy {
    /// Whether a full internal child at `child_level` should buffer
    /// incoming keys instead of splitting immediately.
    pub fn buffers_at(&self, child_level: usize) -> bool {
        match self {
            SplitPolicy::Immediate => false,
            SplitPolicy::Buffered { min_level } => child_level >= *min_level,
        }
    }
}

/// Configuration for a [`crate::index::BufferedBTree`].
///
/// # Example
/// ```
/// use tiertree::common::config::{SplitPolicy, TreeConfig};
///
/// let config = TreeConfig::new(3, 4, 2).with_split_policy(SplitPolicy::Buffered { min_level: 2 });
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_keys(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum degree `t`. Every node holds at most `2t - 1` keys and
    /// every non-root node holds at least `t - 1`.
    pub min_degree: usize,

    /// Number of storage partitions deep nodes are hashed across.
    pub num_partitions: usize,

    /// Deepest level kept in the in-memory tier (root = level 1).
    pub max_in_memory_level: usize,

    /// Split discipline for full children on the insertion path.
    pub split_policy: SplitPolicy,
}

impl TreeConfig {
    /// Create a configuration with the immediate split policy.
    pub fn new(min_degree: usize, num_partitions: usize, max_in_memory_level: usize) -> Self {
        Self {
            min_degree,
            num_partitions,
            max_in_memory_level,
            split_policy: SplitPolicy::Immediate,
        }
    }

    /// Replace the split policy.
    pub fn with_split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Validate all parameters, failing fast on the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.min_degree < MIN_DEGREE_FLOOR {
            return Err(Error::InvalidMinDegree(self.min_degree));
        }
        if self.num_partitions == 0 {
            return Err(Error::InvalidPartitionCount(self.num_partitions));
        }
        if self.max_in_memory_level == 0 {
            return Err(Error::InvalidMemoryLevel(self.max_in_memory_level));
        }
        Ok(())
    }

    /// Maximum keys per node: `2t - 1`.
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Minimum keys per non-root node: `t - 1`.
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.min_degree - 1
    }

    /// Buffer capacity before a flush is forced: `2t - 1`, matching the
    /// key capacity of the node being deferred.
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.max_keys()
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_DEGREE,
            DEFAULT_NUM_PARTITIONS,
            DEFAULT_MAX_IN_MEMORY_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TreeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_degree, 3);
        assert_eq!(config.max_keys(), 5);
        assert_eq!(config.min_keys(), 2);
    }

    #[test]
    fn test_min_degree_floor() {
        let config = TreeConfig::new(1, 4, 2);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidMinDegree(1))
        ));

        let config = TreeConfig::new(2, 4, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let config = TreeConfig::new(3, 0, 2);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidPartitionCount(0))
        ));
    }

    #[test]
    fn test_zero_memory_level_rejected() {
        let config = TreeConfig::new(3, 4, 0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidMemoryLevel(0))
        ));
    }

    #[test]
    fn test_split_policy_levels() {
        let policy = SplitPolicy::Buffered { min_level: 3 };
        assert!(!policy.buffers_at(1));
        assert!(!policy.buffers_at(2));
        assert!(policy.buffers_at(3));
        assert!(policy.buffers_at(7));

        assert!(!SplitPolicy::Immediate.buffers_at(1));
        assert!(!SplitPolicy::Immediate.buffers_at(100));
    }
}
