// =====================================================================
// File: bplus/mod.rs
//
//! The `bplus` module contains the rebalancing index tree: a multiway
//! search tree with insert, search and delete, where deletes borrow
//! from or merge with siblings to keep every node at least half full.
//!
//! The name is historical. Leaves are not linked and keys carry no
//! separate payload, so there are no leaf-chain range scans.
//!
//! Structure:
//! - `node.rs`  : Defines [`BPlusNode`] and its helpers.
//! - `tree.rs`  : Defines [`BPlusTree`] (insert, search, delete).
//! - `tests.rs` : Unit tests (compiled only in test mode).
// =====================================================================

pub mod node;
pub mod tree;

pub use self::node::BPlusNode;
pub use self::tree::BPlusTree;
