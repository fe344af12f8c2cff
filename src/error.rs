//! Error types for tiertree.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in tiertree.
///
/// Construction parameters are validated eagerly, so a tree that exists is
/// always well-configured. Structural preconditions inside the tree itself
/// (such as splitting a non-full node) are programmer errors and panic
/// instead of surfacing here.
#[derive(Debug, Error)]
pub enum Error {
    /// Minimum degree below the B-tree floor of 2.
    ///
    /// With `t < 2` a node could hold fewer than one key and a split
    /// would have no median to promote.
    #[error("minimum degree must be at least 2, got {0}")]
    InvalidMinDegree(usize),

    /// Partition count of zero; routing computes `hash % num_partitions`.
    #[error("partition count must be at least 1, got {0}")]
    InvalidPartitionCount(usize),

    /// In-memory level threshold of zero; the root lives at level 1 and
    /// must always be resident.
    #[error("in-memory level threshold must be at least 1, got {0}")]
    InvalidMemoryLevel(usize),

    /// A partition store was addressed with an out-of-range index.
    #[error("unknown partition index {0}")]
    UnknownPartition(usize),

    /// A stored partition record failed checksum or parse validation.
    #[error("corrupt record in partition {partition}: {detail}")]
    CorruptRecord { partition: usize, detail: String },

    /// I/O error from a file-backed partition store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
