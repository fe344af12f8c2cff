//! Partition storage backends.
//!
//! The tree core only produces [`crate::index::TierReport`] snapshots;
//! whatever durable medium sits behind a partition index is the
//! caller's capability. [`PartitionStore`] is that boundary, with two
//! reference implementations: an in-memory store for tests and
//! simulations, and a minimal append-only file store.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::common::{Error, PartitionId, Result};

/// A sink for deep-node key snapshots, addressed by partition index.
///
/// Implementations decide what "storing" means — the core calls
/// `write_bucket` once per routed node and never reads back.
pub trait PartitionStore<K> {
    /// Persist one node's key snapshot under the given partition.
    fn write_bucket(&mut self, partition: PartitionId, keys: &[K]) -> Result<()>;
}

/// Simulated sharded storage: one in-memory bucket list per partition.
///
/// Snapshot order within a bucket is arrival order.
#[derive(Debug, Clone, Default)]
pub struct MemoryPartitionStore<K> {
    buckets: Vec<Vec<Vec<K>>>,
}

impl<K> MemoryPartitionStore<K> {
    /// Create a store with `num_partitions` empty buckets.
    pub fn new(num_partitions: usize) -> Self {
        Self {
            buckets: (0..num_partitions).map(|_| Vec::new()).collect(),
        }
    }

    /// The snapshots written to one partition so far.
    pub fn bucket(&self, partition: PartitionId) -> &[Vec<K>] {
        &self.buckets[partition.index()]
    }

    /// Total snapshots across all partitions.
    pub fn node_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

impl<K: Clone> PartitionStore<K> for MemoryPartitionStore<K> {
    fn write_bucket(&mut self, partition: PartitionId, keys: &[K]) -> Result<()> {
        let bucket = self
            .buckets
            .get_mut(partition.index())
            .ok_or(Error::UnknownPartition(partition.index()))?;
        bucket.push(keys.to_vec());
        Ok(())
    }
}

/// Append-only file storage: one `partition_<i>.dat` file per partition.
///
/// # Record format
/// One text line per node snapshot:
/// ```text
/// <crc32 hex>,<key>,<key>,...
/// ```
/// Keys are rendered with `Display` and must not themselves contain
/// commas or newlines. The checksum covers the joined key text and is
/// verified on [`read_bucket`](Self::read_bucket).
#[derive(Debug)]
pub struct FilePartitionStore {
    dir: PathBuf,
    num_partitions: usize,
}

impl FilePartitionStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn create<P: AsRef<Path>>(dir: P, num_partitions: usize) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            num_partitions,
        })
    }

    /// Path of one partition's backing file.
    pub fn partition_path(&self, partition: PartitionId) -> PathBuf {
        self.dir.join(format!("partition_{}.dat", partition.index()))
    }

    fn check_partition(&self, partition: PartitionId) -> Result<()> {
        if partition.index() >= self.num_partitions {
            return Err(Error::UnknownPartition(partition.index()));
        }
        Ok(())
    }

    /// Read every snapshot stored under one partition, verifying
    /// checksums and re-parsing keys.
    ///
    /// A partition that was never written reads back empty.
    pub fn read_bucket<K: FromStr>(&self, partition: PartitionId) -> Result<Vec<Vec<K>>> {
        self.check_partition(partition)?;

        let path = self.partition_path(partition);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let corrupt = |detail: String| Error::CorruptRecord {
            partition: partition.index(),
            detail,
        };

        let mut snapshots = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let (crc_text, payload) = line
                .split_once(',')
                .ok_or_else(|| corrupt(format!("malformed record: {line:?}")))?;

            let stored_crc = u32::from_str_radix(crc_text, 16)
                .map_err(|_| corrupt(format!("bad checksum field: {crc_text:?}")))?;
            let actual_crc = crc32fast::hash(payload.as_bytes());
            if stored_crc != actual_crc {
                return Err(corrupt(format!(
                    "checksum mismatch: stored {stored_crc:08x}, computed {actual_crc:08x}"
                )));
            }

            let keys = if payload.is_empty() {
                Vec::new()
            } else {
                payload
                    .split(',')
                    .map(|field| {
                        K::from_str(field)
                            .map_err(|_| corrupt(format!("unparseable key: {field:?}")))
                    })
                    .collect::<Result<Vec<K>>>()?
            };
            snapshots.push(keys);
        }
        Ok(snapshots)
    }
}

impl<K: fmt::Display> PartitionStore<K> for FilePartitionStore {
    fn write_bucket(&mut self, partition: PartitionId, keys: &[K]) -> Result<()> {
        self.check_partition(partition)?;

        let payload = keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let crc = crc32fast::hash(payload.as_bytes());

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.partition_path(partition))?;
        writeln!(file, "{crc:08x},{payload}")?;
        Ok(())
    }
}
