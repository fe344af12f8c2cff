//! Partition routing and storage collaborators.
//!
//! Deep tree nodes are sharded across a fixed set of partitions. This
//! module owns both halves of that boundary:
//! - [`PartitionRouter`] - deterministic key-sequence → partition hashing
//! - [`PartitionStore`] - the durable-backend capability the core calls
//!   into (with in-memory and file-backed reference implementations)

mod router;
mod store;

pub use router::{PartitionKey, PartitionRouter};
pub use store::{FilePartitionStore, MemoryPartitionStore, PartitionStore};
