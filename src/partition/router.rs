//! Hash-based partition routing for deep tree nodes.

use crate::common::PartitionId;

/// Byte projection of a key for partition hashing.
///
/// The projection must be a pure function of the key's value — routing
/// has to be deterministic across runs, so the default `Hash` machinery
/// (which is randomized for `HashMap` DoS resistance) is not usable
/// here. Fixed-width integers project big-endian; strings project their
/// UTF-8 bytes.
pub trait PartitionKey {
    /// Stable byte representation fed to the partition hash.
    fn partition_bytes(&self) -> Vec<u8>;
}

macro_rules! impl_partition_key_for_int {
    ($($ty:ty),*) => {
        $(
            impl PartitionKey for $ty {
                fn partition_bytes(&self) -> Vec<u8> {
                    self.to_be_bytes().to_vec()
                }
            }
        )*
    };
}

impl_partition_key_for_int!(i32, i64, u32, u64, usize);

impl PartitionKey for String {
    fn partition_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl PartitionKey for &str {
    fn partition_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

/// Routes node key-snapshots to storage partitions.
///
/// The hash is CRC32 over the concatenated byte projections of the
/// node's whole key sequence, reduced modulo the partition count.
/// Hashing every key (rather than a single representative) avoids the
/// skew a freshly split node would introduce: two halves of one node
/// land independently instead of following their old first key.
///
/// Collisions across partitions are expected sharding behavior, not a
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRouter {
    num_partitions: usize,
}

impl PartitionRouter {
    /// Create a router over `num_partitions` buckets.
    ///
    /// # Panics
    /// Panics if `num_partitions` is 0. [`crate::TreeConfig::validate`]
    /// rejects that before a router is ever built.
    pub fn new(num_partitions: usize) -> Self {
        assert!(num_partitions >= 1, "num_partitions must be >= 1");
        Self { num_partitions }
    }

    /// Number of partitions routed across.
    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// Deterministically pick the partition for a node's key sequence.
    pub fn route<K: PartitionKey>(&self, keys: &[K]) -> PartitionId {
        let mut hasher = crc32fast::Hasher::new();
        for key in keys {
            hasher.update(&key.partition_bytes());
        }
        PartitionId::new(hasher.finalize() as usize % self.num_partitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_is_deterministic() {
        let router = PartitionRouter::new(4);
        let keys: Vec<i64> = vec![5, 6, 7];

        let first = router.route(&keys);
        for _ in 0..10 {
            assert_eq!(router.route(&keys), first);
        }
    }

    #[test]
    fn test_route_in_range() {
        let router = PartitionRouter::new(3);
        for start in 0i64..50 {
            let keys: Vec<i64> = (start..start + 4).collect();
            assert!(router.route(&keys).index() < 3);
        }
    }

    #[test]
    fn test_route_depends_on_all_keys() {
        // Same first key, different tails: assignments must not be
        // forced to collide the way first-key hashing would force them.
        let router = PartitionRouter::new(64);
        let base = router.route(&[10i64, 20, 30]);
        let differing = (0i64..100)
            .map(|tail| router.route(&[10i64, 20, tail]))
            .filter(|p| *p != base)
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn test_route_single_partition() {
        let router = PartitionRouter::new(1);
        assert_eq!(router.route(&[1i64, 2, 3]), PartitionId::new(0));
        assert_eq!(router.route::<i64>(&[]), PartitionId::new(0));
    }

    #[test]
    fn test_string_keys_route() {
        let router = PartitionRouter::new(4);
        let keys = vec!["apple".to_string(), "pear".to_string()];
        assert_eq!(router.route(&keys), router.route(&keys));
        assert!(router.route(&keys).index() < 4);
    }

    #[test]
    #[should_panic(expected = "num_partitions must be >= 1")]
    fn test_zero_partitions_panics() {
        PartitionRouter::new(0);
    }
}
