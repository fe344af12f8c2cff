//! Common types and utilities shared across tiertree.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Tree configuration and split policies
//! - Error types
//! - Identifiers (PartitionId)

pub mod config;
mod partition_id;

pub use crate::error::{Error, Result};
pub use config::{SplitPolicy, TreeConfig};
pub use partition_id::PartitionId;
