// =====================================================================
// File: btree/mod.rs
//
//! The `btree` module contains the filter-assisted B-tree: a classic
//! multiway search tree in which every node carries a Bloom filter over
//! the keys of its subtree, so search can stop early on a filter miss.
//!
//! Structure:
//! - `node.rs`  : Defines [`FilteredNode`] and its helpers.
//! - `tree.rs`  : Defines [`FilteredBTree`] (insert, search).
//! - `tests.rs` : Unit tests (compiled only in test mode).
//!
//! There is no delete here. Filter bits cannot be unset, so a delete
//! would have to rebuild every filter on the path from the node's
//! remaining keys.
// =====================================================================

pub mod node;
pub mod tree;

pub use self::node::FilteredNode;
pub use self::tree::FilteredBTree;
