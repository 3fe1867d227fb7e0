// =====================================================================
// File: integration_trees.rs
//
// Description:
//   Integration tests for both index trees through the public API
//   only. These tests exercise the full flow of the crate:
//
//   - Building trees from a `TreeConfig` (including one read from JSON)
//   - The fixed insert/search/delete scenarios used by the demo driver
//   - Mixed workloads checked against a sorted `Vec` model
//   - Observers swapped in after construction
// =====================================================================
use btree_index::{
    BPlusTree, ConfigError, EventKind, FilteredBTree, RecordingObserver, TracingObserver,
    TreeConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KEYS: [i32; 8] = [10, 20, 5, 6, 12, 30, 7, 17];


#[test]
fn test_filtered_btree_scenario() {
    let mut tree = FilteredBTree::new(TreeConfig::with_degree(3));
    for k in KEYS {
        tree.insert(k);
    }
    assert!(tree.search(&6));
    assert!(!tree.search(&15));
    assert!(tree.check_invariants().is_ok());
}


#[test]
fn test_bplus_tree_scenario() {
    let mut tree = BPlusTree::new(TreeConfig::with_degree(2));
    for k in KEYS {
        tree.insert(k);
    }
    for k in [6, 20, 5] {
        tree.delete(&k);
    }

    for k in [10, 12, 30, 7, 17] {
        assert!(tree.search(&k), "value {} should be found", k);
    }
    for k in [6, 20, 5] {
        assert!(!tree.search(&k), "deleted value {} should not be found", k);
    }
    for k in [4, 22, 100] {
        assert!(!tree.search(&k), "never inserted value {} should not be found", k);
    }
    assert!(tree.check_invariants().is_ok());
}


#[test]
fn test_config_from_json_drives_both_trees() {
    let config: TreeConfig =
        serde_json::from_str(r#"{"min_degree": 4, "filter": {"bits": 512, "probes": 4}}"#).unwrap();

    let mut filtered = FilteredBTree::new(config);
    let mut plain = BPlusTree::new(config);
    for k in 0..100 {
        filtered.insert(k);
        plain.insert(k);
    }
    assert_eq!(filtered.config().filter.bits, 512);
    assert_eq!(filtered.root().filter.bit_len(), 512);
    assert_eq!(filtered.root().filter.probe_count(), 4);
    assert_eq!(plain.config().min_degree, 4);
    assert_eq!(filtered.keys(), plain.keys());
}


#[test]
fn test_bad_configs_are_rejected() {
    assert_eq!(
        BPlusTree::<u8>::try_new(TreeConfig::with_degree(1)).unwrap_err(),
        ConfigError::MinDegreeTooSmall(1)
    );
    assert_eq!(
        FilteredBTree::<u8>::try_new(TreeConfig::with_degree(2).filter(0, 3)).unwrap_err(),
        ConfigError::EmptyFilter
    );
    assert_eq!(
        FilteredBTree::<u8>::try_new(TreeConfig::with_degree(2).filter(10, 0)).unwrap_err(),
        ConfigError::NoProbes
    );

    // Capacity 2t - 1 would overflow, so construction must fail up front
    let huge = usize::MAX / 2 + 1;
    assert_eq!(
        BPlusTree::<u8>::try_new(TreeConfig::with_degree(huge)).unwrap_err(),
        ConfigError::MinDegreeTooLarge(huge)
    );
    assert_eq!(
        FilteredBTree::<u8>::try_new(TreeConfig::with_degree(huge)).unwrap_err(),
        ConfigError::MinDegreeTooLarge(huge)
    );
}


#[test]
fn test_random_workload_matches_model() {
    let mut rng = StdRng::seed_from_u64(5350);
    for t in 2..=5 {
        let mut tree = BPlusTree::new(TreeConfig::with_degree(t));
        let mut model: Vec<u16> = Vec::new();

        for _ in 0..2000 {
            let key = rng.gen_range(0..300u16);
            if rng.gen_bool(0.55) {
                tree.insert(key);
                let pos = model.partition_point(|k| *k <= key);
                model.insert(pos, key);
            } else {
                let expected = model.binary_search(&key).ok();
                assert_eq!(tree.delete(&key), expected.is_some(), "delete {} with t = {}", key, t);
                if let Some(pos) = expected {
                    model.remove(pos);
                }
            }
        }

        assert!(tree.check_invariants().is_ok(), "t = {}", t);
        let keys: Vec<u16> = tree.keys().into_iter().copied().collect();
        assert_eq!(keys, model);
        for key in 0..300u16 {
            assert_eq!(tree.search(&key), model.binary_search(&key).is_ok());
        }
    }
}


#[test]
fn test_filtered_random_inserts_have_no_false_negatives() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = FilteredBTree::new(TreeConfig::with_degree(3).filter(256, 3));
    let mut inserted = Vec::new();
    for _ in 0..1500 {
        let key: u32 = rng.gen_range(0..5000);
        tree.insert(key);
        inserted.push(key);
    }
    for key in &inserted {
        assert!(tree.search(key), "false negative for {}", key);
    }
    inserted.sort_unstable();
    for key in 0..5000u32 {
        assert_eq!(tree.search(&key), inserted.binary_search(&key).is_ok());
    }
    assert!(tree.check_invariants().is_ok());
}


#[test]
fn test_observers_can_be_swapped() {
    let mut tree = BPlusTree::new(TreeConfig::with_degree(2)).with_observer(TracingObserver);
    for k in KEYS {
        tree.insert(k);
    }

    let mut tree = tree.with_observer(RecordingObserver::new());
    for k in [6, 20, 5] {
        tree.delete(&k);
    }
    assert_eq!(tree.observer().count(EventKind::Delete), 3);
    assert_eq!(tree.observer().count(EventKind::Insert), 0);
}
