//! Bounded FIFO of ghost entries.
//!
//! Remembers the keys of recently evicted pages without their values, so an
//! admission policy can tell a genuine re-reference from a cold miss. Backed
//! by a [`SentinelList`] plus a hash index for O(1) membership checks.
//!
//! ## Record Flow (capacity = 3)
//!
//! ```text
//!   record("d") when full:
//!     1. at capacity: pop the oldest ghost ("a") and unindex it
//!     2. push "d" at the newest end
//!
//!   head ──► [d] ◄──► [c] ◄──► [b] ──► tail
//!           newest            oldest
//! ```
//!
//! The oldest ghost is dropped *before* the new one is pushed, so a key
//! recorded into a full list is always remembered afterwards, even at
//! capacity 1. A hit removes the ghost via [`remove`](GhostFifo::remove);
//! entries are otherwise forgotten only by aging out.
//!
//! A capacity of 0 disables tracking entirely (every record is a no-op).

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::node_arena::NodeId;
use crate::ds::sentinel_list::SentinelList;

/// Bounded key-only FIFO used to remember recent evictees.
#[derive(Debug)]
pub struct GhostFifo<K> {
    list: SentinelList<K>,
    index: FxHashMap<K, NodeId>,
    capacity: usize,
}

impl<K> GhostFifo<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates a ghost list remembering at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: SentinelList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Returns the configured bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of ghosts currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is a tracked ghost.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` as the newest ghost, aging out the oldest if full.
    ///
    /// Re-recording a key that is already tracked leaves it in place.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 || self.index.contains_key(&key) {
            return;
        }
        if self.list.len() >= self.capacity {
            if let Some(old) = self.list.pop_back() {
                self.index.remove(&old);
            }
        }
        let id = self.list.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Forgets `key`; returns `true` if it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.unlink(id);
                true
            },
            None => false,
        }
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns tracked keys newest-first.
    pub fn debug_snapshot_keys(&self) -> Vec<K> {
        self.list.iter().cloned().collect()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for (key, &id) in &self.index {
            assert_eq!(self.list.get(id), Some(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_ages_out_fifo() {
        let mut ghost = GhostFifo::new(2);
        ghost.record("a");
        ghost.record("b");
        assert!(ghost.contains(&"a"));
        assert!(ghost.contains(&"b"));

        ghost.record("c");
        assert!(!ghost.contains(&"a"));
        assert!(ghost.contains(&"b"));
        assert!(ghost.contains(&"c"));
        assert_eq!(ghost.len(), 2);
    }

    #[test]
    fn capacity_one_remembers_latest() {
        let mut ghost = GhostFifo::new(1);
        ghost.record("a");
        ghost.record("b");
        assert!(!ghost.contains(&"a"));
        assert!(ghost.contains(&"b"));
        assert_eq!(ghost.len(), 1);
    }

    #[test]
    fn zero_capacity_is_noop() {
        let mut ghost = GhostFifo::new(0);
        ghost.record("a");
        assert!(ghost.is_empty());
        assert!(!ghost.contains(&"a"));
    }

    #[test]
    fn rerecord_keeps_position() {
        let mut ghost = GhostFifo::new(3);
        ghost.record("a");
        ghost.record("b");
        ghost.record("a");
        assert_eq!(ghost.debug_snapshot_keys(), vec!["b", "a"]);
    }

    #[test]
    fn remove_existing_and_missing() {
        let mut ghost = GhostFifo::new(2);
        ghost.record("a");
        assert!(ghost.remove(&"a"));
        assert!(!ghost.remove(&"a"));
        assert!(ghost.is_empty());
        ghost.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_state() {
        let mut ghost = GhostFifo::new(2);
        ghost.record("a");
        ghost.record("b");
        ghost.clear();
        assert!(ghost.is_empty());
        assert!(!ghost.contains(&"a"));
        ghost.debug_validate_invariants();
    }
}
