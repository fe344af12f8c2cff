//! Index structures.
//!
//! Currently one index lives here: the buffered B-tree with partition
//! tiering. The module keeps its own namespace so alternative index
//! layouts can sit alongside it later.

pub mod btree;

pub use btree::{BufferedBTree, NodeSnapshot, PartitionTable, SharedTree, TierReport, TreeStats};
