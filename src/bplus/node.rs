// =====================================================================
// File: bplus/node.rs
//
// Description:
//   Defines the node of the rebalancing index tree (`BPlusNode`).
//
//   - `keys`    : Ordered keys stored within the node.
//   - `children`: Owned child nodes (empty if this node is a leaf).
//   - `is_leaf` : Whether the node is a leaf.
// =====================================================================


/// Basic multiway tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BPlusNode<K> {
    pub keys: Vec<K>,
    /// Box keeps the recursive type sized - children live on the heap
    pub children: Vec<Box<BPlusNode<K>>>,
    pub is_leaf: bool,
}


impl<K> BPlusNode<K> {
    /// Creates a new empty node.
    ///
    /// # Example
    /// ```
    /// use btree_index::BPlusNode;
    /// let leaf: BPlusNode<i32> = BPlusNode::new(true);
    /// assert!(leaf.keys.is_empty());
    /// assert!(leaf.is_leaf);
    /// ```
    pub fn new(is_leaf: bool) -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            is_leaf,
        }
    }

    /// Smallest key of this subtree (first key of the leftmost leaf).
    pub fn min_key(&self) -> Option<&K> {
        let mut node = self;
        while !node.is_leaf {
            node = &node.children[0];
        }
        node.keys.first()
    }

    /// Collects every key of this subtree into `out`, in order.
    ///
    /// # Example
    /// ```
    /// use btree_index::BPlusNode;
    ///
    /// let mut node = BPlusNode::new(true);
    /// node.keys.push("a");
    /// node.keys.push("b");
    ///
    /// let mut out = Vec::new();
    /// node.collect_keys(&mut out);
    /// assert_eq!(out, vec![&"a", &"b"]);
    /// ```
    pub fn collect_keys<'a>(&'a self, out: &mut Vec<&'a K>) {
        if self.is_leaf {
            out.extend(self.keys.iter());
        } else {
            // Internal node: in-order traversal
            for i in 0..self.keys.len() {
                self.children[i].collect_keys(out);
                out.push(&self.keys[i]);
            }
            // Rightmost subtree
            self.children[self.keys.len()].collect_keys(out);
        }
    }
}


impl<K: Ord> BPlusNode<K> {
    /// Index of the first key `>= key` (or `keys.len()`).
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Index of the first key `> key` (or `keys.len()`).
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }
}
