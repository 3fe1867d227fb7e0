//! # btree-index
//! In-memory ordered indexes for fast membership queries over any
//! totally-ordered key type.
//!
//! ## Features
//! - [`FilteredBTree`]: a B-tree whose nodes each carry a Bloom filter
//!   over their subtree, so a search can stop at the first filter miss.
//! - [`BPlusTree`]: a B-tree with delete; underflowing nodes borrow from
//!   or merge with a sibling.
//! - [`TreeObserver`] hooks for split/borrow/merge/probe events, with a
//!   [`TracingObserver`] that forwards them to `tracing`.
//!
//! ## Usage
//! ```
//! use btree_index::{BPlusTree, FilteredBTree, TreeConfig};
//!
//! let mut filtered = FilteredBTree::new(TreeConfig::with_degree(3));
//! let mut plain = BPlusTree::new(TreeConfig::with_degree(2));
//! for k in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     filtered.insert(k);
//!     plain.insert(k);
//! }
//! assert!(filtered.search(&6));
//! assert!(plain.delete(&6));
//! assert!(!plain.search(&6));
//! ```
// =====================================================================
// File: lib.rs
//
//   Crate root. Module map:
//
//     `config`   -> TreeConfig / FilterConfig and their validation
//     `observer` -> structural event hooks
//     `filter`   -> the per-node Bloom filter
//     `btree`    -> filter-assisted B-tree (insert, search)
//     `bplus`    -> rebalancing tree (insert, search, delete)
// =====================================================================
pub mod config;
pub use config::{ConfigError, FilterConfig, TreeConfig};

pub mod observer;
pub use observer::{
    EventKind, NoopObserver, RecordingObserver, TracingObserver, TreeEvent, TreeObserver,
};

pub mod filter;
pub use filter::{MembershipFilter, ProbeHasher, SeededHasher};

pub mod btree;
pub use btree::{FilteredBTree, FilteredNode};

pub mod bplus;
pub use bplus::{BPlusNode, BPlusTree};
