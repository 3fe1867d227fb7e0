// =====================================================================
// File: btree/node.rs
//
// Description:
//   Defines the node of the filter-assisted B-tree (`FilteredNode`).
//   Each node maintains:
//
//   - `keys`    : Ordered keys stored within the node.
//   - `children`: Owned child nodes (empty if this node is a leaf).
//   - `is_leaf` : Whether the node is a leaf.
//   - `filter`  : Bloom filter covering every key in this subtree.
//
// Notes:
//   * The filter covers the whole subtree, not just the node, so a
//     filter miss proves the key is nowhere below.
//   * Insert/search live in `tree.rs`.
// =====================================================================
use crate::filter::{MembershipFilter, ProbeHasher, SeededHasher};
use std::hash::Hash;


/// B-tree node with a subtree Bloom filter.
#[derive(Debug, Clone)]
pub struct FilteredNode<K, H = SeededHasher> {
    pub keys: Vec<K>,
    pub children: Vec<Box<FilteredNode<K, H>>>,
    pub is_leaf: bool,
    pub filter: MembershipFilter<K, H>,
}


impl<K, H> FilteredNode<K, H> {
    /// Creates an empty node that owns `filter`.
    ///
    /// # Example
    /// ```
    /// use btree_index::{FilterConfig, FilteredNode, MembershipFilter};
    /// let filter = MembershipFilter::new(FilterConfig::default());
    /// let leaf: FilteredNode<i32> = FilteredNode::new(true, filter);
    /// assert!(leaf.keys.is_empty());
    /// assert!(leaf.is_leaf);
    /// ```
    pub fn new(is_leaf: bool, filter: MembershipFilter<K, H>) -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            is_leaf,
            filter,
        }
    }

    /// Calls `f` on every key in this subtree, in order.
    pub fn for_each_key<'a, F: FnMut(&'a K)>(&'a self, f: &mut F) {
        if self.is_leaf {
            for key in &self.keys {
                f(key);
            }
            return;
        }
        for (i, key) in self.keys.iter().enumerate() {
            self.children[i].for_each_key(f);
            f(key);
        }
        if let Some(last) = self.children.last() {
            last.for_each_key(f);
        }
    }

    /// Appends references to every key in this subtree to `out`, in order.
    pub fn collect_keys<'a>(&'a self, out: &mut Vec<&'a K>) {
        self.for_each_key(&mut |k| out.push(k));
    }
}


impl<K: Ord, H> FilteredNode<K, H> {
    /// Index of the first key `>= key` (or `keys.len()`).
    ///
    /// Search uses this: a hit sits at the returned index, and otherwise the
    /// child with the same index is the one to descend into.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Index of the first key `> key` (or `keys.len()`).
    ///
    /// Insert uses this so equal keys land to the right of existing ones.
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }
}


impl<K: Hash, H: ProbeHasher + Clone> FilteredNode<K, H> {
    /// Replaces the filter with one built from this subtree's current keys.
    pub fn rebuild_filter(&mut self) {
        let mut filter = self.filter.empty_like();
        self.for_each_key(&mut |k| filter.add(k));
        self.filter = filter;
    }
}
