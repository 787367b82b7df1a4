//! SIEVE cache replacement policy.
//!
//! SIEVE approximates LRU with a single visited bit per entry and a hand
//! that sweeps from the oldest entry toward the newest. Reads only set a
//! bit; no list surgery happens until an eviction is needed.
//!
//! ## Architecture
//!
//! ```text
//!   HEAD ◄──► [e] ◄──► [d] ◄──► [c] ◄──► [b] ◄──► [a] ◄──► TAIL
//!            newest              ▲                oldest
//!                                │
//!                              hand (next eviction candidate)
//!
//!   index: FxHashMap<K, NodeId>  (key -> list node)
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! GET(key):
//!   found    -> visited := true, return true
//!   missing  -> return false
//!
//! INSERT(key, value):
//!   resident -> overwrite value in place
//!   full     -> EVICT, then link fresh node after HEAD with visited = false
//!
//! EVICT():
//!   hand unset            -> hand := TAIL.prev (oldest)
//!   while hand.visited    -> clear bit, step toward HEAD,
//!                            wrapping to TAIL.prev past the boundary
//!   victim := hand; hand := victim.prev; unlink victim
//! ```
//!
//! The visited bit grants each entry exactly one second chance per sweep;
//! clearing bits while sweeping guarantees the sweep terminates even when
//! every resident entry is marked. Steady-state eviction is amortized O(1).
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::sieve::SieveCache;
//!
//! let mut cache = SieveCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//!
//! assert!(cache.get(&"a"));          // marks "a" visited
//! cache.insert("c", 3);              // "b" is swept out, "a" survives
//!
//! assert!(!cache.get(&"b"));
//! assert_eq!(cache.peek(&"a"), Some(&1));
//! ```

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::node_arena::NodeId;
use crate::ds::sentinel_list::SentinelList;
use crate::error::ConfigError;
use crate::traits::ReadOnlyCache;

#[derive(Debug)]
struct SieveEntry<K, V> {
    key: K,
    value: V,
    visited: bool,
}

/// Bounded cache evicting by the SIEVE one-bit clock policy.
///
/// `get` reports residency and marks the entry visited without returning or
/// moving the value; use [`peek`](SieveCache::peek) to read a value without
/// touching eviction state.
#[derive(Debug)]
pub struct SieveCache<K, V> {
    list: SentinelList<SieveEntry<K, V>>,
    index: FxHashMap<K, NodeId>,
    hand: Option<NodeId>,
    capacity: usize,
}

impl<K, V> SieveCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        Self {
            list: SentinelList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            hand: None,
            capacity,
        }
    }

    /// Fallible constructor for caller-supplied capacities.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self::new(capacity))
    }

    /// Marks `key` visited if resident. Returns residency.
    ///
    /// Does not move the entry; position in the sweep order is fixed at
    /// insertion.
    pub fn get(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                if let Some(entry) = self.list.get_mut(id) {
                    entry.visited = true;
                }
                true
            },
            None => false,
        }
    }

    /// Returns the stored value without touching the visited bit.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Inserts `key`, evicting by the sweep if the cache is full.
    ///
    /// Inserting a resident key overwrites its value in place; position,
    /// visited bit, and hand are untouched and nothing is evicted.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            return;
        }

        if self.index.len() == self.capacity {
            self.evict();
        }

        let id = self.list.push_front(SieveEntry {
            key: key.clone(),
            value,
            visited: false,
        });
        self.index.insert(key, id);
    }

    /// Runs one eviction sweep and unlinks the victim.
    fn evict(&mut self) {
        let mut hand = match self.hand {
            Some(id) if self.list.contains(id) => id,
            _ => self.oldest(),
        };

        loop {
            let entry = self.list.get_mut(hand).expect("hand left the live list");
            if !entry.visited {
                break;
            }
            entry.visited = false;
            let prev = self.list.prev_id(hand).expect("live node missing prev");
            hand = if prev == self.list.head_id() {
                self.oldest()
            } else {
                prev
            };
        }

        let prev = self.list.prev_id(hand).expect("victim missing prev");
        self.hand = (prev != self.list.head_id()).then_some(prev);

        let victim = self.list.unlink(hand).expect("victim already unlinked");
        self.index.remove(&victim.key);
    }

    fn oldest(&self) -> NodeId {
        self.list.back_id().expect("eviction sweep on an empty cache")
    }

    /// Removes every entry and resets the hand.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
        self.hand = None;
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns resident keys in list order, newest first.
    pub fn debug_snapshot_keys(&self) -> Vec<K> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns the key the hand currently rests on, if set.
    pub fn debug_hand_key(&self) -> Option<K> {
        let id = self.hand?;
        self.list.get(id).map(|entry| entry.key.clone())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert!(self.index.len() <= self.capacity);
        assert_eq!(self.index.len(), self.list.len());
        for (key, &id) in &self.index {
            let entry = self.list.get(id).expect("indexed node not linked");
            assert_eq!(&entry.key, key);
        }
        if let Some(id) = self.hand {
            assert!(self.list.contains(id), "hand points at a dead node");
        }
    }
}

impl<K, V> ReadOnlyCache<K> for SieveCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn zero_capacity_panics() {
        let _ = SieveCache::<&str, i32>::new(0);
    }

    #[test]
    fn try_new_rejects_zero_capacity() {
        assert!(SieveCache::<&str, i32>::try_new(0).is_err());
        assert!(SieveCache::<&str, i32>::try_new(1).is_ok());
    }

    #[test]
    fn get_marks_and_reports_residency() {
        let mut cache = SieveCache::new(2);
        cache.insert("a", 1);
        assert!(cache.get(&"a"));
        assert!(!cache.get(&"missing"));
        assert_eq!(cache.peek(&"a"), Some(&1));
    }

    #[test]
    fn insert_into_empty_never_evicts() {
        let mut cache = SieveCache::new(3);
        cache.insert("a", 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&"a"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn visited_entry_survives_one_sweep() {
        let mut cache = SieveCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get(&"a");

        cache.insert("c", 3);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.debug_snapshot_keys(), vec!["c", "a"]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn all_visited_sweep_wraps_and_evicts_oldest() {
        let mut cache = SieveCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get(&"a");
        cache.get(&"b");

        cache.insert("c", 3);

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn capacity_one_always_replaces_resident() {
        let mut cache = SieveCache::new(1);
        cache.insert("k1", 1);
        cache.get(&"k1");
        cache.insert("k2", 2);

        assert!(!cache.contains(&"k1"));
        assert!(cache.contains(&"k2"));
        assert_eq!(cache.len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn unvisited_entries_evict_in_fifo_order() {
        let mut cache = SieveCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        cache.insert("d", 4);
        assert!(!cache.contains(&"a"));

        cache.insert("e", 5);
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.debug_snapshot_keys(), vec!["e", "d", "c"]);
    }

    #[test]
    fn hand_resumes_before_previous_victim() {
        let mut cache = SieveCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        // first sweep evicts "a", hand rests on "b"
        cache.insert("d", 4);
        assert_eq!(cache.debug_hand_key(), Some("b"));

        // "b" gets its second chance before "c" is considered
        cache.get(&"b");
        cache.insert("e", 5);
        assert!(cache.contains(&"b"));
        assert!(!cache.contains(&"c"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn reinsert_updates_value_in_place() {
        let mut cache = SieveCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.peek(&"a"), Some(&10));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.debug_snapshot_keys(), vec!["b", "a"]);
    }

    #[test]
    fn clear_resets_hand_and_index() {
        let mut cache = SieveCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get(&"a");
        cache.insert("c", 3);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.debug_hand_key(), None);
        cache.insert("x", 9);
        assert!(cache.contains(&"x"));
        cache.debug_validate_invariants();
    }
}
