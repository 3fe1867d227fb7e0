// =====================================================================
// File: btree/tree.rs
//
// Description:
//   Implements the filter-assisted B-tree (`FilteredBTree`). Insert
//   is the classic single-pass top-down algorithm (split full nodes on
//   the way down). Search asks each node's filter first and stops on a
//   miss.
//
// Features:
//   - `insert`: Adds a key. Duplicates are inserted again.
//   - `search`: Filter pre-check, then key scan, then descent.
//   - `check_invariants`: Walks the tree and reports the first broken
//     ordering, degree, depth or filter-coverage rule.
//
// Notes:
//   * Filter upkeep: every node on an insert path records the key; a
//     new root starts with a copy of the old root's filter; both halves
//     of a split rebuild their filters from their own subtrees.
//   * Split partition is the same for leaves and internal nodes: the
//     left half keeps keys[..t-1] (and children[..t]), the median
//     keys[t-1] moves up, the right half takes the rest.
// =====================================================================
use super::FilteredNode;
use crate::config::{ConfigError, TreeConfig};
use crate::filter::{MembershipFilter, ProbeHasher, SeededHasher};
use crate::observer::{NoopObserver, TreeEvent, TreeObserver};
use std::hash::Hash;

/// B-tree whose nodes each carry a Bloom filter over their subtree.
///
/// # Example
/// ```
/// use btree_index::{FilteredBTree, TreeConfig};
///
/// let mut tree = FilteredBTree::new(TreeConfig::with_degree(3));
/// for k in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(k);
/// }
/// assert!(tree.search(&6));
/// assert!(!tree.search(&15));
/// ```
#[derive(Debug)]
pub struct FilteredBTree<K, O = NoopObserver, H = SeededHasher> {
    config: TreeConfig,
    root: Box<FilteredNode<K, H>>,
    len: usize,
    observer: O,
}


impl<K: Ord + Hash> FilteredBTree<K> {
    /// Create an empty tree.
    ///
    /// # Panics
    /// If `config` is invalid (`t < 2`, zero filter bits or probes).
    pub fn new(config: TreeConfig) -> Self {
        match Self::try_new(config) {
            Ok(tree) => tree,
            Err(e) => panic!("invalid tree config: {}", e),
        }
    }

    /// Create an empty tree, reporting a bad config instead of panicking.
    pub fn try_new(config: TreeConfig) -> Result<Self, ConfigError> {
        Self::try_with_hasher(config, SeededHasher::default())
    }
}


impl<K: Ord + Hash, H: ProbeHasher + Clone> FilteredBTree<K, NoopObserver, H> {
    /// Create an empty tree whose filters place probes with `hasher`.
    pub fn try_with_hasher(config: TreeConfig, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = MembershipFilter::with_hasher(config.filter, hasher);
        Ok(Self {
            config,
            root: Box::new(FilteredNode::new(true, filter)),
            len: 0,
            observer: NoopObserver,
        })
    }
}


impl<K, O, H> FilteredBTree<K, O, H> {
    /// Swap the observer, keeping the tree contents.
    pub fn with_observer<O2>(self, observer: O2) -> FilteredBTree<K, O2, H> {
        FilteredBTree {
            config: self.config,
            root: self.root,
            len: self.len,
            observer,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> &FilteredNode<K, H> {
        &self.root
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Number of keys inserted, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 1 for a lone root.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while !node.is_leaf {
            node = &node.children[0];
            height += 1;
        }
        height
    }

    /// All keys in order.
    pub fn keys(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_keys(&mut out);
        out
    }
}


impl<K, O, H> FilteredBTree<K, O, H>
where
    K: Ord + Hash,
    O: TreeObserver<K>,
    H: ProbeHasher + Clone,
{
    /// Insert a key.
    ///
    /// If the root is full it is split first, under a fresh root whose
    /// filter starts as a copy of the old root's, so the descent below
    /// never meets a full node it cannot split.
    pub fn insert(&mut self, key: K) {
        let t = self.config.min_degree;
        self.observer.on_event(&TreeEvent::Insert { key: &key });

        if self.root.keys.len() == self.config.max_keys() {
            // New root covers the same keys, so it inherits the filter
            let new_root = Box::new(FilteredNode::new(false, self.root.filter.clone()));
            let old_root = std::mem::replace(&mut self.root, new_root);
            self.root.children.push(old_root);

            Self::split_child(&mut self.root, t, 0, &mut self.observer);
            let height = self.height();
            self.observer.on_event(&TreeEvent::RootGrow { height });
        }

        Self::insert_non_full(&mut self.root, t, key, &mut self.observer);
        self.len += 1;
    }

    /// True if `key` was inserted.
    ///
    /// A filter miss at any visited node ends the search with `false`.
    pub fn search(&self, key: &K) -> bool {
        Self::search_node(&self.root, key, &mut |_| {})
    }

    /// Same as [`search`](Self::search) but reports filter misses to the observer.
    pub fn search_observed(&mut self, key: &K) -> bool {
        let Self { root, observer, .. } = self;
        Self::search_node(root, key, &mut |e| observer.on_event(e))
    }


    // =========================
    // Search helper
    // =========================

    fn search_node<F>(node: &FilteredNode<K, H>, key: &K, report: &mut F) -> bool
    where
        F: FnMut(&TreeEvent<'_, K>),
    {
        if let Some((probe, bit)) = node.filter.first_clear_probe(key) {
            report(&TreeEvent::FilterMiss { key, probe, bit });
            return false;
        }

        // Filter says maybe - scan the node
        let idx = node.lower_bound(key);
        if idx < node.keys.len() && node.keys[idx] == *key {
            return true;
        }

        if node.is_leaf {
            false
        } else {
            Self::search_node(&node.children[idx], key, report)
        }
    }


    // =========================
    // Insertion helpers
    // =========================

    /// Inserts `key` into the subtree rooted at `node`, which must not be full.
    ///
    /// Records the key in `node`'s filter first, then either places it (leaf)
    /// or splits the target child if needed and recurses.
    fn insert_non_full(node: &mut FilteredNode<K, H>, t: usize, key: K, observer: &mut O) {
        for (probe, bit) in node.filter.probe_positions(&key) {
            observer.on_event(&TreeEvent::FilterAdd { key: &key, probe, bit });
        }
        node.filter.add(&key);

        let mut idx = node.upper_bound(&key);

        // Base case - leaf insert
        if node.is_leaf {
            node.keys.insert(idx, key);
            return;
        }

        if node.children[idx].keys.len() == 2 * t - 1 {
            Self::split_child(node, t, idx, observer);

            // The promoted median now sits at idx
            if key > node.keys[idx] {
                idx += 1;
            }
        }
        Self::insert_non_full(&mut node.children[idx], t, key, observer);
    }


    /// Split the full child at `node.children[i]`.
    ///
    /// - The left child keeps the first `t - 1` keys (and `t` children).
    /// - The right child receives the last `t - 1` keys (and `t` children).
    /// - The median key moves into the parent at position `i`.
    /// - Both halves rebuild their filters; the parent's is left alone
    ///   because its subtree still holds the same keys.
    fn split_child(node: &mut FilteredNode<K, H>, t: usize, i: usize, observer: &mut O) {
        let full_child = &mut node.children[i];
        let right_filter = full_child.filter.empty_like();
        let mut right = Box::new(FilteredNode::new(full_child.is_leaf, right_filter));

        right.keys = full_child.keys.split_off(t);
        let middle = full_child.keys.pop().expect("full child must have a median key");

        if !full_child.is_leaf {
            right.children = full_child.children.split_off(t);
        }

        full_child.rebuild_filter();
        right.rebuild_filter();

        observer.on_event(&TreeEvent::Split {
            promoted: &middle,
            left_len: full_child.keys.len(),
            right_len: right.keys.len(),
        });

        node.keys.insert(i, middle);
        node.children.insert(i + 1, right);
    }


    // =========================
    // Invariant checking
    // =========================

    /// Walks the whole tree and reports the first broken rule.
    ///
    /// Checked: keys sorted within and across nodes, non-root key counts in
    /// `t-1..=2t-1`, `children == keys + 1` for internal nodes, all leaves at
    /// one depth, and every subtree key passes its node's filter.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut leaf_depth = None;
        Self::check_node(&self.root, &self.config, true, 0, &mut leaf_depth, None, None)?;

        let keys = self.keys();
        if keys.len() != self.len {
            return Err(format!("tree holds {} keys but len is {}", keys.len(), self.len));
        }
        if !keys.windows(2).all(|w| w[0] <= w[1]) {
            return Err("in-order traversal is not sorted".to_string());
        }
        Ok(())
    }

    fn check_node(
        node: &FilteredNode<K, H>,
        config: &TreeConfig,
        is_root: bool,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(), String> {
        let n = node.keys.len();
        if n > config.max_keys() {
            return Err(format!(
                "node at depth {} holds {} keys, max is {}",
                depth,
                n,
                config.max_keys()
            ));
        }
        if !is_root && n < config.min_keys() {
            return Err(format!(
                "node at depth {} holds {} keys, min is {}",
                depth,
                n,
                config.min_keys()
            ));
        }
        if !node.keys.windows(2).all(|w| w[0] <= w[1]) {
            return Err(format!("node at depth {} has unsorted keys", depth));
        }
        if lower.is_some_and(|lo| node.keys.first().is_some_and(|k| k < lo))
            || upper.is_some_and(|hi| node.keys.last().is_some_and(|k| k > hi))
        {
            return Err(format!("node at depth {} escapes its parent's key range", depth));
        }

        let mut missing = false;
        node.for_each_key(&mut |k| missing |= !node.filter.contains(k));
        if missing {
            return Err(format!("filter at depth {} misses a key of its subtree", depth));
        }

        if node.is_leaf {
            if !node.children.is_empty() {
                return Err(format!("leaf at depth {} has children", depth));
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(d) if d != depth => {
                    return Err(format!("leaves at depths {} and {}", d, depth));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != n + 1 {
            return Err(format!(
                "internal node at depth {} has {} keys but {} children",
                depth,
                n,
                node.children.len()
            ));
        }
        for (i, child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { node.keys.get(i - 1) };
            let hi = if i == n { upper } else { node.keys.get(i) };
            Self::check_node(child, config, false, depth + 1, leaf_depth, lo, hi)?;
        }
        Ok(())
    }
}
