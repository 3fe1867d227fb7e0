// =====================================================================
// File: bplus/tree.rs
//
// Description:
//   Implements the rebalancing index tree (`BPlusTree`) that manages
//   insertion, search, and deletion over `BPlusNode` structures.
//
// Features:
//   - `insert`: Top-down insert, splitting full nodes on the way down.
//               Duplicates are inserted again.
//   - `search`: Standard B-tree search.
//   - `delete`: Removes one occurrence of a key, then repairs any
//               underflowing child on the way back up (borrow left,
//               borrow right, else merge - left neighbour first).
//
// Notes:
//   * Keys are physically removed only from leaves. A key found as a
//     separator in an internal node is overwritten by its in-order
//     successor, and the successor is deleted from the right subtree.
//   * A keyless internal root is replaced by its only child.
// =====================================================================
use super::BPlusNode;
use crate::config::{ConfigError, TreeConfig};
use crate::observer::{NoopObserver, TreeEvent, TreeObserver};

/// Multiway search tree with delete-and-rebalance.
///
/// # Example
/// ```
/// use btree_index::{BPlusTree, TreeConfig};
///
/// let mut tree = BPlusTree::new(TreeConfig::with_degree(2));
/// for k in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(k);
/// }
/// assert!(tree.delete(&20));
/// assert!(!tree.search(&20));
/// assert!(!tree.delete(&20));
/// ```
#[derive(Debug)]
pub struct BPlusTree<K, O = NoopObserver> {
    config: TreeConfig,
    root: Box<BPlusNode<K>>,
    len: usize,
    observer: O,
}


impl<K: Ord + Clone> BPlusTree<K> {
    /// Create a new empty tree.
    ///
    /// # Panics
    /// If `config` is invalid (`t < 2`).
    pub fn new(config: TreeConfig) -> Self {
        match Self::try_new(config) {
            Ok(tree) => tree,
            Err(e) => panic!("invalid tree config: {}", e),
        }
    }

    /// Create a new empty tree, reporting a bad config instead of panicking.
    pub fn try_new(config: TreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            root: Box::new(BPlusNode::new(true)),
            len: 0,
            observer: NoopObserver,
        })
    }
}


impl<K, O> BPlusTree<K, O> {
    /// Swap the observer, keeping the tree contents.
    pub fn with_observer<O2>(self, observer: O2) -> BPlusTree<K, O2> {
        BPlusTree {
            config: self.config,
            root: self.root,
            len: self.len,
            observer,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> &BPlusNode<K> {
        &self.root
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Number of keys held, duplicates included.
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


impl<K, O> BPlusTree<K, O>
where
    K: Ord + Clone,
    O: TreeObserver<K>,
{
    /// Search for a key.
    ///
    /// # Returns
    /// * `true` if at least one copy of `key` is stored.
    /// * `false` otherwise, including on an empty tree.
    pub fn search(&self, key: &K) -> bool {

        // Recursive function declaration for node search
        fn search_node<K: Ord>(node: &BPlusNode<K>, key: &K) -> bool {
            let idx = node.lower_bound(key);

            // Found the key in the current node
            if idx < node.keys.len() && node.keys[idx] == *key {
                return true;
            }

            if node.is_leaf {
                false
            } else {
                search_node(&node.children[idx], key)
            }
        }
        search_node(&self.root, key)
    }

    /// Insert a key.
    ///
    /// If the root is full, the tree grows in height by splitting the root
    /// under a new one before descending.
    pub fn insert(&mut self, key: K) {
        let t = self.config.min_degree;
        self.observer.on_event(&TreeEvent::Insert { key: &key });

        if self.root.keys.len() == self.config.max_keys() {
            // Create a new root and hang the old root under it
            let old_root = std::mem::replace(&mut self.root, Box::new(BPlusNode::new(false)));
            self.root.children.push(old_root);

            Self::split_child(&mut self.root, t, 0, &mut self.observer);
            let height = self.height();
            self.observer.on_event(&TreeEvent::RootGrow { height });
        }

        Self::insert_non_full(&mut self.root, t, key, &mut self.observer);
        self.len += 1;
    }

    /// Delete one occurrence of a key.
    ///
    /// # Returns
    /// * `true` if a copy of `key` was found and removed.
    /// * `false` if `key` is absent; the tree is left untouched.
    ///
    /// # Behavior
    /// - Every non-root node still holds at least `t - 1` keys afterwards.
    /// - If the root is left with no keys and one child, that child becomes
    ///   the root and the tree loses a level.
    pub fn delete(&mut self, key: &K) -> bool {
        let t = self.config.min_degree;
        let found = Self::delete_internal(&mut self.root, t, key, &mut self.observer);

        // If the root became empty and is internal - shrink height
        if !self.root.is_leaf && self.root.keys.is_empty() {
            self.root = self.root.children.remove(0);
            let height = self.height();
            self.observer.on_event(&TreeEvent::RootShrink { height });
        }

        if found {
            self.len -= 1;
        }
        self.observer.on_event(&TreeEvent::Delete { key, found });
        found
    }


    // =========================
    // Insertion helpers
    // =========================

    /// Inserts `key` into the subtree rooted at `node`, which must not be full.
    ///
    /// Equal keys go to the right of existing ones. A full target child is
    /// split before the descent.
    fn insert_non_full(node: &mut BPlusNode<K>, t: usize, key: K, observer: &mut O) {
        let mut idx = node.upper_bound(&key);

        // Base case - leaf insert
        if node.is_leaf {
            node.keys.insert(idx, key);
            return;
        }

        // Recurse case: make sure the target child has room
        if node.children[idx].keys.len() == 2 * t - 1 {
            Self::split_child(node, t, idx, observer);

            // After split decide which child to descend into
            if key > node.keys[idx] {
                idx += 1;
            }
        }
        Self::insert_non_full(&mut node.children[idx], t, key, observer);
    }


    /// Split a full child node during insertion.
    ///
    /// - The left child keeps the first `t - 1` keys (and `t` children).
    /// - The right child receives the last `t - 1` keys (and `t` children).
    /// - The median key `keys[t - 1]` moves up into the parent at position `i`.
    fn split_child(node: &mut BPlusNode<K>, t: usize, i: usize, observer: &mut O) {
        let full_child = &mut node.children[i];
        let mut right = Box::new(BPlusNode::new(full_child.is_leaf));

        right.keys = full_child.keys.split_off(t);
        let middle = full_child.keys.pop().expect("full child must have a median key");

        if !full_child.is_leaf {
            right.children = full_child.children.split_off(t);
        }

        observer.on_event(&TreeEvent::Split {
            promoted: &middle,
            left_len: full_child.keys.len(),
            right_len: right.keys.len(),
        });

        node.keys.insert(i, middle);
        node.children.insert(i + 1, right);
    }


    // =========================
    // Deletion helpers
    // =========================

    /// Recursive helper for deleting a key from the subtree rooted at `node`.
    ///
    /// # Behavior
    /// 1. Find `idx`, the first key `>= key`.
    /// 2. **Leaf**: remove `keys[idx]` if it equals `key`, else report not found.
    /// 3. **Internal**:
    ///    - If `keys[idx]` equals `key`, replace it with the smallest key of
    ///      `children[idx + 1]`, move `idx` one right, and delete that
    ///      successor instead.
    ///    - Recurse into `children[idx]`. A miss propagates as `false` with
    ///      nothing changed.
    ///    - If the child fell below `t - 1` keys, rebalance it.
    fn delete_internal(node: &mut BPlusNode<K>, t: usize, key: &K, observer: &mut O) -> bool {
        let mut idx = node.lower_bound(key);
        let hit = idx < node.keys.len() && node.keys[idx] == *key;

        if node.is_leaf {
            if hit {
                node.keys.remove(idx);
            }
            return hit;
        }

        let found = if hit {
            let successor = node.children[idx + 1]
                .min_key()
                .expect("non-root subtree holds at least one key")
                .clone();
            node.keys[idx] = successor.clone();
            idx += 1;
            Self::delete_internal(&mut node.children[idx], t, &successor, observer)
        } else {
            Self::delete_internal(&mut node.children[idx], t, key, observer)
        };

        if !found {
            return false;
        }

        if node.children[idx].keys.len() < t - 1 {
            Self::rebalance(node, t, idx, observer);
        }
        true
    }


    /// Repairs `node.children[idx]` after it dropped below `t - 1` keys.
    ///
    /// - Borrow from the left sibling if it has at least `t` keys.
    /// - Else borrow from the right sibling if it has at least `t` keys.
    /// - Else merge with the left sibling, or with the right one if `idx == 0`.
    fn rebalance(node: &mut BPlusNode<K>, t: usize, idx: usize, observer: &mut O) {
        if idx > 0 && node.children[idx - 1].keys.len() >= t {
            Self::borrow_from_prev(node, idx);
            observer.on_event(&TreeEvent::BorrowLeft { index: idx });
        } else if idx + 1 < node.children.len() && node.children[idx + 1].keys.len() >= t {
            Self::borrow_from_next(node, idx);
            observer.on_event(&TreeEvent::BorrowRight { index: idx });
        } else if idx > 0 {
            Self::merge_children(node, idx - 1, observer);
        } else {
            Self::merge_children(node, idx, observer);
        }
    }


    /// Child `idx` takes one key from child `idx - 1` through the parent.
    ///
    /// The parent separator moves down to the front of the child, the left
    /// sibling's last key moves up to replace it, and for internal nodes the
    /// left sibling's last child moves across too.
    fn borrow_from_prev(node: &mut BPlusNode<K>, idx: usize) {
        let (left_slice, right_slice) = node.children.split_at_mut(idx);
        let left = &mut left_slice[idx - 1];
        let child = &mut right_slice[0];

        // Left's last key goes up, old separator comes down
        let left_last = left.keys.pop().expect("left sibling has spare keys");
        let separator = std::mem::replace(&mut node.keys[idx - 1], left_last);
        child.keys.insert(0, separator);

        if !left.is_leaf {
            let moved = left.children.pop().expect("left sibling has a child to move");
            child.children.insert(0, moved);
        }
    }


    /// Child `idx` takes one key from child `idx + 1` through the parent.
    ///
    /// Mirror image of [`borrow_from_prev`](Self::borrow_from_prev): the
    /// separator goes to the end of the child, the right sibling's first key
    /// replaces it, and its first child moves across for internal nodes.
    fn borrow_from_next(node: &mut BPlusNode<K>, idx: usize) {
        let (left_slice, right_slice) = node.children.split_at_mut(idx + 1);
        let right = &mut right_slice[0];
        let child = &mut left_slice[idx];

        let right_first = right.keys.remove(0);
        let separator = std::mem::replace(&mut node.keys[idx], right_first);
        child.keys.push(separator);

        if !right.is_leaf {
            let moved = right.children.remove(0);
            child.children.push(moved);
        }
    }


    /// Merge `node.children[idx]`, the separating parent key,
    /// and `node.children[idx + 1]` into a single child at `idx`.
    fn merge_children(node: &mut BPlusNode<K>, idx: usize, observer: &mut O) {
        let mut right = node.children.remove(idx + 1);
        let separator = node.keys.remove(idx);
        observer.on_event(&TreeEvent::Merge { separator: &separator });

        let left = &mut node.children[idx];
        left.keys.push(separator);
        left.keys.append(&mut right.keys);

        if !left.is_leaf {
            left.children.append(&mut right.children);
        }
    }


    // =========================
    // Invariant checking
    // =========================

    /// Walks the whole tree and reports the first broken rule.
    ///
    /// Checked: keys sorted within and across nodes, non-root key counts in
    /// `t-1..=2t-1`, `children == keys + 1` for internal nodes, and all
    /// leaves at one depth.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut leaf_depth = None;
        Self::check_node(&self.root, &self.config, true, 0, &mut leaf_depth, None, None)?;

        let keys = self.keys();
        if keys.len() != self.len {
            return Err(format!("tree holds {} keys but len is {}", keys.len(), self.len));
        }
        if !self.root.is_leaf && self.root.keys.is_empty() {
            return Err("internal root has no keys".to_string());
        }
        Ok(())
    }

    fn check_node(
        node: &BPlusNode<K>,
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
