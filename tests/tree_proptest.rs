// =====================================================================
// File: tree_proptest.rs
//
// Description:
//   Property tests for both trees. Random operation sequences are run
//   against each tree and a sorted `Vec` model, checking membership,
//   global ordering, degree invariants and filter soundness.
// =====================================================================
use btree_index::{BPlusTree, FilterConfig, FilteredBTree, MembershipFilter, TreeConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Insert(u8),
    Delete(u8),
    Search(u8),
}

fn operations() -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(
        prop_oneof![
            3 => any::<u8>().prop_map(Operation::Insert),
            2 => any::<u8>().prop_map(Operation::Delete),
            1 => any::<u8>().prop_map(Operation::Search),
        ],
        1..300,
    )
}

proptest! {
    #[test]
    fn bplus_tree_matches_sorted_model(t in 2usize..6, ops in operations()) {
        let mut tree = BPlusTree::new(TreeConfig::with_degree(t));
        let mut model: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                Operation::Insert(k) => {
                    tree.insert(k);
                    let pos = model.partition_point(|x| *x <= k);
                    model.insert(pos, k);
                }
                Operation::Delete(k) => {
                    let pos = model.binary_search(&k).ok();
                    prop_assert_eq!(
                        tree.delete(&k),
                        pos.is_some(),
                        "delete result mismatch for key {}",
                        k
                    );
                    if let Some(pos) = pos {
                        model.remove(pos);
                    }
                }
                Operation::Search(k) => {
                    prop_assert_eq!(tree.search(&k), model.binary_search(&k).is_ok());
                }
            }
            if let Err(e) = tree.check_invariants() {
                return Err(TestCaseError::fail(e));
            }
        }

        let keys: Vec<u8> = tree.keys().into_iter().copied().collect();
        prop_assert_eq!(keys, model);
    }

    #[test]
    fn filtered_btree_membership(t in 2usize..6, bits in 1usize..512, probes in 1u32..5,
                                 keys in proptest::collection::vec(any::<u16>(), 0..300)) {
        let mut tree = FilteredBTree::new(TreeConfig::with_degree(t).filter(bits, probes));
        for k in &keys {
            tree.insert(*k);
        }
        if let Err(e) = tree.check_invariants() {
            return Err(TestCaseError::fail(e));
        }

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        for k in &keys {
            prop_assert!(tree.search(k), "inserted key {} not found", k);
        }
        for probe in [0u16, 1, 999, 31_337, u16::MAX] {
            prop_assert_eq!(tree.search(&probe), sorted.binary_search(&probe).is_ok());
        }
        let in_order: Vec<u16> = tree.keys().into_iter().copied().collect();
        prop_assert_eq!(in_order, sorted);
    }

    #[test]
    fn filter_has_no_false_negatives(bits in 1usize..2048, probes in 1u32..8,
                                     items in proptest::collection::vec(any::<i64>(), 0..200)) {
        let mut filter: MembershipFilter<i64> =
            MembershipFilter::new(FilterConfig::new(bits, probes));
        for item in &items {
            filter.add(item);
        }
        for item in &items {
            prop_assert!(filter.contains(item));
        }
        prop_assert!(filter.set_bits() <= bits);
    }
}
