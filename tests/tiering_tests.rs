//! Integration tests for classification walks and partition storage.

use tiertree::{
    BufferedBTree, FilePartitionStore, MemoryPartitionStore, PartitionId, TreeConfig,
};

fn deep_tree(num_keys: i64) -> BufferedBTree<i64> {
    // t=2 grows tall quickly, guaranteeing cold levels.
    let mut tree = BufferedBTree::new(TreeConfig::new(2, 4, 2)).unwrap();
    for key in 0..num_keys {
        tree.insert(key);
    }
    tree
}

#[test]
fn test_shallow_tree_is_fully_resident() {
    let mut tree = BufferedBTree::new(TreeConfig::new(3, 4, 2)).unwrap();
    for key in [10i64, 20, 5, 6, 12, 30, 7, 17] {
        tree.insert(key);
    }

    let report = tree.classify_and_route();
    assert_eq!(report.in_memory.len(), 3);
    assert_eq!(report.partitions.node_count(), 0);

    // Breadth order: root, then both leaves.
    assert_eq!(report.in_memory[0].level, 1);
    assert_eq!(report.in_memory[1].level, 2);
    assert_eq!(report.in_memory[2].level, 2);

    // The resident tier carries the whole key set.
    let mut resident: Vec<i64> = report
        .in_memory
        .iter()
        .flat_map(|snap| snap.keys.iter().copied())
        .collect();
    resident.sort();
    assert_eq!(resident, vec![5, 6, 7, 10, 12, 17, 20, 30]);
}

#[test]
fn test_deep_nodes_route_to_valid_partitions() {
    let tree = deep_tree(600);
    let report = tree.classify_and_route();

    assert!(report.partitions.node_count() > 0);
    for (partition, snapshots) in report.partitions.iter() {
        assert!(partition.index() < 4);
        for keys in snapshots {
            assert!(!keys.is_empty(), "deep node snapshot with no keys");
            assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    // Resident snapshots stop at the configured level.
    assert!(report.in_memory.iter().all(|snap| snap.level <= 2));
}

#[test]
fn test_classification_partitions_every_key_once() {
    let tree = deep_tree(600);
    let report = tree.classify_and_route();

    let mut seen: Vec<i64> = report
        .in_memory
        .iter()
        .flat_map(|snap| snap.keys.iter().copied())
        .collect();
    for (_, snapshots) in report.partitions.iter() {
        for keys in snapshots {
            seen.extend(keys.iter().copied());
        }
    }
    seen.sort();

    assert_eq!(seen, (0..600).collect::<Vec<i64>>());
}

#[test]
fn test_reclassification_is_stable() {
    let tree = deep_tree(600);
    let first = tree.classify_and_route();
    let second = tree.classify_and_route();

    assert_eq!(first, second);
    for i in 0..4 {
        assert_eq!(
            first.partitions.bucket(PartitionId::new(i)),
            second.partitions.bucket(PartitionId::new(i))
        );
    }
}

#[test]
fn test_report_flows_into_memory_store() {
    let tree = deep_tree(600);
    let report = tree.classify_and_route();

    let mut store = MemoryPartitionStore::new(4);
    report.write_to(&mut store).unwrap();

    assert_eq!(store.node_count(), report.partitions.node_count());
    for i in 0..4 {
        let pid = PartitionId::new(i);
        assert_eq!(store.bucket(pid), report.partitions.bucket(pid));
    }
}

#[test]
fn test_report_flows_into_file_store_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let tree = deep_tree(600);
    let report = tree.classify_and_route();

    let mut store = FilePartitionStore::create(dir.path(), 4).unwrap();
    report.write_to(&mut store).unwrap();

    for i in 0..4 {
        let pid = PartitionId::new(i);
        let read_back: Vec<Vec<i64>> = store.read_bucket(pid).unwrap();
        assert_eq!(read_back, report.partitions.bucket(pid));
    }
}

#[test]
fn test_single_partition_takes_all_cold_nodes() {
    let mut tree = BufferedBTree::new(TreeConfig::new(2, 1, 1)).unwrap();
    for key in 0i64..200 {
        tree.insert(key);
    }

    let report = tree.classify_and_route();
    assert_eq!(report.in_memory.len(), 1); // only the root is resident
    assert_eq!(
        report.partitions.bucket(PartitionId::new(0)).len(),
        report.partitions.node_count()
    );
    assert!(report.partitions.node_count() > 0);
}

#[test]
fn test_empty_tree_classifies_to_single_resident_root() {
    let tree: BufferedBTree<i64> = BufferedBTree::new(TreeConfig::new(3, 4, 2)).unwrap();
    let report = tree.classify_and_route();

    assert_eq!(report.in_memory.len(), 1);
    assert!(report.in_memory[0].keys.is_empty());
    assert!(report.in_memory[0].is_leaf);
    assert_eq!(report.partitions.node_count(), 0);
}
