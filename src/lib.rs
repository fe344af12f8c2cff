//! tiertree - a buffered B-tree index with depth-based hot/cold
//! partition tiering.
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          tiertree                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │               Index Layer (index/)                     │  │
//! │  │   BufferedBTree: insert → buffer/split → classify      │  │
//! │  │        SharedTree: RwLock single-writer wrapper        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                             ↓                                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             Tiering Output (TierReport)                │  │
//! │  │   levels ≤ threshold → in-memory tier (breadth order)  │  │
//! │  │   deeper levels      → crc32(keys) % num_partitions    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                             ↓                                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            Partition Layer (partition/)                │  │
//! │  │  PartitionRouter + PartitionStore (memory | files)     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tree keeps classic B-tree balance (uniform leaf depth, node key
//! counts in `t-1..=2t-1`) while deferring split work: a full internal
//! node on the insertion path can park incoming keys in a write buffer
//! and pay for one split per `2t - 1` deferred insertions. A separate
//! classification walk simulates a hot/cold storage hierarchy by
//! keeping the top levels of the tree resident and hashing deeper
//! nodes into fixed storage partitions.
//!
//! # Modules
//! - [`common`] - Shared primitives (TreeConfig, SplitPolicy, PartitionId, Error)
//! - [`index`] - The buffered B-tree and its tiering walk
//! - [`partition`] - Partition routing and storage backends
//!
//! # Quick Start
//! ```
//! use tiertree::index::BufferedBTree;
//! use tiertree::partition::MemoryPartitionStore;
//! use tiertree::TreeConfig;
//!
//! let mut tree = BufferedBTree::new(TreeConfig::new(3, 4, 2)).unwrap();
//! for key in [10i64, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! // Classify nodes by depth: shallow levels stay resident, deep
//! // nodes are routed to partitions and handed to a storage backend.
//! let report = tree.classify_and_route();
//! let mut store = MemoryPartitionStore::new(4);
//! report.write_to(&mut store).unwrap();
//! ```

// Core modules
pub mod common;
pub mod error;
pub mod index;
pub mod partition;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, PartitionId, Result, SplitPolicy, TreeConfig};
pub use index::{BufferedBTree, NodeSnapshot, PartitionTable, SharedTree, TierReport, TreeStats};
pub use partition::{
    FilePartitionStore, MemoryPartitionStore, PartitionKey, PartitionRouter, PartitionStore,
};
