// =====================================================================
// File: observer.rs
//
// Description:
//   Structural event hooks for both index trees. Each tree owns one
//   observer and reports to it while an operation runs (key added,
//   filter probe, split, borrow, merge, root growth/shrink).
//
// Notes:
//   * `NoopObserver` is the default and compiles down to nothing.
//   * `TracingObserver` forwards events to the `tracing` crate.
//   * `RecordingObserver` keeps a copy of every event for tests.
// =====================================================================
use std::fmt::Debug;

/// Something that happened inside a tree during an operation.
#[derive(Debug)]
pub enum TreeEvent<'a, K> {
    /// A key is about to be inserted.
    Insert { key: &'a K },
    /// A filter probe set bit `bit` while recording `key`.
    FilterAdd { key: &'a K, probe: u32, bit: usize },
    /// A filter probe found bit `bit` clear, so `key` is not below this node.
    FilterMiss { key: &'a K, probe: u32, bit: usize },
    /// A full child was split and `promoted` moved into its parent.
    Split { promoted: &'a K, left_len: usize, right_len: usize },
    /// The root was split; the tree is now `height` levels tall.
    RootGrow { height: usize },
    /// A keyless root was replaced by its only child.
    RootShrink { height: usize },
    /// A delete finished.
    Delete { key: &'a K, found: bool },
    /// Child `index` took a key from its left sibling.
    BorrowLeft { index: usize },
    /// Child `index` took a key from its right sibling.
    BorrowRight { index: usize },
    /// Two siblings were merged around `separator`.
    Merge { separator: &'a K },
}

/// Fieldless tag for a [`TreeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Insert,
    FilterAdd,
    FilterMiss,
    Split,
    RootGrow,
    RootShrink,
    Delete,
    BorrowLeft,
    BorrowRight,
    Merge,
}

impl<K> TreeEvent<'_, K> {
    pub fn kind(&self) -> EventKind {
        match self {
            TreeEvent::Insert { .. } => EventKind::Insert,
            TreeEvent::FilterAdd { .. } => EventKind::FilterAdd,
            TreeEvent::FilterMiss { .. } => EventKind::FilterMiss,
            TreeEvent::Split { .. } => EventKind::Split,
            TreeEvent::RootGrow { .. } => EventKind::RootGrow,
            TreeEvent::RootShrink { .. } => EventKind::RootShrink,
            TreeEvent::Delete { .. } => EventKind::Delete,
            TreeEvent::BorrowLeft { .. } => EventKind::BorrowLeft,
            TreeEvent::BorrowRight { .. } => EventKind::BorrowRight,
            TreeEvent::Merge { .. } => EventKind::Merge,
        }
    }

    /// The key an event is about, if it carries one.
    pub fn key(&self) -> Option<&K> {
        match self {
            TreeEvent::Insert { key }
            | TreeEvent::FilterAdd { key, .. }
            | TreeEvent::FilterMiss { key, .. }
            | TreeEvent::Delete { key, .. } => Some(key),
            TreeEvent::Split { promoted, .. } => Some(promoted),
            TreeEvent::Merge { separator } => Some(separator),
            TreeEvent::RootGrow { .. }
            | TreeEvent::RootShrink { .. }
            | TreeEvent::BorrowLeft { .. }
            | TreeEvent::BorrowRight { .. } => None,
        }
    }
}


/// Receives structural events from a tree.
pub trait TreeObserver<K> {
    fn on_event(&mut self, event: &TreeEvent<'_, K>);
}


/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<K> TreeObserver<K> for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: &TreeEvent<'_, K>) {}
}


/// Emits every event through `tracing`.
///
/// Filter probes go out at `TRACE`, structural changes at `DEBUG`. Nothing is
/// printed unless the host installs a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl<K: Debug> TreeObserver<K> for TracingObserver {
    fn on_event(&mut self, event: &TreeEvent<'_, K>) {
        match event {
            TreeEvent::Insert { key } => tracing::debug!(?key, "inserting key"),
            TreeEvent::FilterAdd { key, probe, bit } => {
                tracing::trace!(?key, probe, bit, "filter bit set")
            }
            TreeEvent::FilterMiss { key, probe, bit } => {
                tracing::trace!(?key, probe, bit, "filter bit clear, key absent")
            }
            TreeEvent::Split { promoted, left_len, right_len } => {
                tracing::debug!(?promoted, left_len, right_len, "split child")
            }
            TreeEvent::RootGrow { height } => tracing::debug!(height, "root split, tree grew"),
            TreeEvent::RootShrink { height } => {
                tracing::debug!(height, "root emptied, tree shrank")
            }
            TreeEvent::Delete { key, found } => tracing::debug!(?key, found, "delete finished"),
            TreeEvent::BorrowLeft { index } => tracing::debug!(index, "borrowed from left sibling"),
            TreeEvent::BorrowRight { index } => {
                tracing::debug!(index, "borrowed from right sibling")
            }
            TreeEvent::Merge { separator } => tracing::debug!(?separator, "merged siblings"),
        }
    }
}


/// Keeps every event (tag plus a cloned key) in arrival order.
#[derive(Debug, Clone)]
pub struct RecordingObserver<K> {
    events: Vec<(EventKind, Option<K>)>,
}

impl<K> Default for RecordingObserver<K> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<K> RecordingObserver<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[(EventKind, Option<K>)] {
        &self.events
    }

    /// How many events of `kind` were seen.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Keys carried by events of `kind`, in order.
    pub fn keys_for(&self, kind: EventKind) -> Vec<&K> {
        self.events
            .iter()
            .filter(|(k, _)| *k == kind)
            .filter_map(|(_, key)| key.as_ref())
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<K: Clone> TreeObserver<K> for RecordingObserver<K> {
    fn on_event(&mut self, event: &TreeEvent<'_, K>) {
        self.events.push((event.kind(), event.key().cloned()));
    }
}


#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn recording_keeps_order_and_keys() {
        let mut rec = RecordingObserver::new();
        rec.on_event(&TreeEvent::Insert { key: &7 });
        rec.on_event(&TreeEvent::RootGrow { height: 2 });
        rec.on_event(&TreeEvent::Split { promoted: &5, left_len: 1, right_len: 1 });

        assert_eq!(rec.events().len(), 3);
        assert_eq!(rec.events()[0], (EventKind::Insert, Some(7)));
        assert_eq!(rec.events()[1], (EventKind::RootGrow, None));
        assert_eq!(rec.keys_for(EventKind::Split), vec![&5]);
        assert_eq!(rec.count(EventKind::Merge), 0);

        rec.clear();
        assert!(rec.events().is_empty());
    }

    #[test]
    fn tracing_observer_accepts_every_event() {
        // No subscriber installed: this only checks the match is total.
        let mut obs = TracingObserver;
        let k = 1;
        let events = [
            TreeEvent::Insert { key: &k },
            TreeEvent::FilterAdd { key: &k, probe: 0, bit: 3 },
            TreeEvent::FilterMiss { key: &k, probe: 1, bit: 4 },
            TreeEvent::Split { promoted: &k, left_len: 1, right_len: 1 },
            TreeEvent::RootGrow { height: 2 },
            TreeEvent::RootShrink { height: 1 },
            TreeEvent::Delete { key: &k, found: true },
            TreeEvent::BorrowLeft { index: 1 },
            TreeEvent::BorrowRight { index: 0 },
            TreeEvent::Merge { separator: &k },
        ];
        for e in &events {
            obs.on_event(e);
        }
    }
}
