// =====================================================================
// File: filter/mod.rs
//
//! The `filter` module holds the probabilistic membership filter that
//! each node of the [`FilteredBTree`](crate::FilteredBTree) owns.
//!
//! Structure:
//! - `bloom.rs` : Defines [`MembershipFilter`] (bit array + `k` probes) and
//!                the [`ProbeHasher`] seam used to place probes.
//! - `tests.rs` : Unit tests for the filter (compiled only in test mode).
// =====================================================================

pub mod bloom;

pub use self::bloom::{MembershipFilter, ProbeHasher, SeededHasher};
