use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::ghost_fifo::GhostFifo;
use crate::ds::node_arena::NodeId;
use crate::ds::sentinel_list::SentinelList;
use crate::error::ConfigError;
use crate::traits::ReadOnlyCache;

/// Which queue currently holds a resident page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTag {
    /// Admission FIFO of first-time insertions.
    A1in,
    /// Main LRU of pages promoted after a ghost hit.
    Am,
}

#[derive(Debug)]
struct PageMeta<V> {
    value: V,
    tag: QueueTag,
    node: NodeId,
}

/// Bounded cache evicting by the 2Q policy.
///
/// New pages are admitted cheaply to the `A1in` FIFO; only pages that are
/// referenced again after aging out of `A1in` are promoted into the main
/// `Am` LRU. The `A1out` ghost FIFO remembers recent `A1in` evictees by key
/// alone so that a genuine re-reference can be told apart from a cold miss.
/// One-hit wonders thus pass through `A1in` without ever polluting `Am`.
///
/// A page in `A1in` that is re-inserted stays where it is: promotion happens
/// only through the ghost list.
///
/// # Example
///
/// ```
/// use evictkit::policy::two_q::{QueueTag, TwoQCache};
///
/// let mut cache = TwoQCache::with_thresholds(3, 1, 1);
/// cache.insert("k1", 1);
/// cache.insert("k2", 2);
/// cache.insert("k3", 3);
/// cache.insert("k4", 4);                 // k1 ages out into the ghost list
///
/// let (prior, present) = cache.insert("k1", 10);
/// assert!(!present && prior.is_none());  // ghost hit, not a resident hit
/// assert_eq!(cache.location(&"k1"), Some(QueueTag::Am));
/// ```
#[derive(Debug)]
pub struct TwoQCache<K, V> {
    pages: FxHashMap<K, PageMeta<V>>,
    a1in: SentinelList<K>,
    am: SentinelList<K>,
    a1out: GhostFifo<K>,
    capacity: usize,
    k_in: usize,
}

impl<K, V> TwoQCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates a 2Q cache with conventional thresholds.
    ///
    /// `K_in` defaults to a quarter of the capacity and `K_out` to half,
    /// each at least 1.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        Self::with_thresholds(capacity, (capacity / 4).max(1), (capacity / 2).max(1))
    }

    /// Creates a 2Q cache with explicit queue bounds.
    ///
    /// `k_in` bounds how many pages `A1in` may hold before reclaim drains it
    /// in preference to `Am`; `k_out` bounds the ghost list (0 disables
    /// ghost tracking and with it all promotion).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `k_in` is zero.
    pub fn with_thresholds(capacity: usize, k_in: usize, k_out: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        assert!(k_in > 0, "A1in bound must be greater than zero");
        Self {
            pages: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            a1in: SentinelList::with_capacity(capacity),
            am: SentinelList::with_capacity(capacity),
            a1out: GhostFifo::new(k_out),
            capacity,
            k_in,
        }
    }

    /// Fallible constructor for caller-supplied thresholds.
    pub fn try_with_thresholds(
        capacity: usize,
        k_in: usize,
        k_out: usize,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        if k_in == 0 {
            return Err(ConfigError::new("A1in bound must be greater than zero"));
        }
        Ok(Self::with_thresholds(capacity, k_in, k_out))
    }

    /// References `key`, installing `value` on a miss.
    ///
    /// Returns `(prior_value, was_present)`:
    ///
    /// - resident in `Am`: moved to the MRU position, stored value kept,
    ///   returns `(Some(&stored), true)`
    /// - resident in `A1in`: position and value untouched (pure FIFO, no
    ///   early promotion), returns `(Some(&stored), true)`
    /// - ghost hit: `value` installed at the MRU end of `Am`, ghost entry
    ///   consumed, returns `(None, false)`
    /// - cold miss: `value` installed at the MRU end of `A1in`, returns
    ///   `(None, false)`
    pub fn insert(&mut self, key: K, value: V) -> (Option<&V>, bool) {
        if let Some(meta) = self.pages.get(&key) {
            if meta.tag == QueueTag::Am {
                let node = meta.node;
                self.am.move_to_front(node);
            }
            let stored = self.pages.get(&key).map(|meta| &meta.value);
            return (stored, true);
        }

        if self.a1out.contains(&key) {
            self.reclaim_slot();
            self.a1out.remove(&key);
            let node = self.am.push_front(key.clone());
            self.pages.insert(
                key,
                PageMeta {
                    value,
                    tag: QueueTag::Am,
                    node,
                },
            );
            return (None, false);
        }

        self.reclaim_slot();
        let node = self.a1in.push_front(key.clone());
        self.pages.insert(
            key,
            PageMeta {
                value,
                tag: QueueTag::A1in,
                node,
            },
        );
        (None, false)
    }

    /// Frees one page slot if the buffer is at capacity.
    ///
    /// Prefers draining `A1in` once it holds `K_in` pages (the evictee's key
    /// moves to the ghost list); otherwise the `Am` LRU page is dropped
    /// outright. Falls back to `A1in` when `Am` has nothing to give.
    fn reclaim_slot(&mut self) {
        if self.pages.len() < self.capacity {
            return;
        }
        if self.a1in.len() >= self.k_in || self.am.is_empty() {
            if let Some(old) = self.a1in.pop_back() {
                self.pages.remove(&old);
                self.a1out.record(old);
            }
        } else if let Some(old) = self.am.pop_back() {
            self.pages.remove(&old);
        }
    }

    /// Returns the stored value without touching queue positions.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.pages.get(key).map(|meta| &meta.value)
    }

    /// Reports which queue holds `key`, if resident.
    pub fn location(&self, key: &K) -> Option<QueueTag> {
        self.pages.get(key).map(|meta| meta.tag)
    }

    /// Returns `true` if `key` is remembered in the ghost list.
    pub fn ghost_contains(&self, key: &K) -> bool {
        self.a1out.contains(key)
    }

    /// `A1in` bound supplied at construction.
    pub fn k_in(&self) -> usize {
        self.k_in
    }

    /// Ghost list bound supplied at construction.
    pub fn k_out(&self) -> usize {
        self.a1out.capacity()
    }

    /// Drops every page and ghost entry.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.a1in.clear();
        self.am.clear();
        self.a1out.clear();
    }

    #[cfg(any(test, debug_assertions))]
    /// Resident keys of `A1in`, newest first.
    pub fn debug_snapshot_a1in(&self) -> Vec<K> {
        self.a1in.iter().cloned().collect()
    }

    #[cfg(any(test, debug_assertions))]
    /// Resident keys of `Am`, most recently used first.
    pub fn debug_snapshot_am(&self) -> Vec<K> {
        self.am.iter().cloned().collect()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.a1in.debug_validate_invariants();
        self.am.debug_validate_invariants();
        self.a1out.debug_validate_invariants();

        assert_eq!(self.pages.len(), self.a1in.len() + self.am.len());
        assert!(self.pages.len() <= self.capacity);

        for (key, meta) in &self.pages {
            let list = match meta.tag {
                QueueTag::A1in => &self.a1in,
                QueueTag::Am => &self.am,
            };
            assert_eq!(list.get(meta.node), Some(key), "page tag disagrees with queue");
            assert!(!self.a1out.contains(key), "resident page shadowed by a ghost");
        }
    }
}

impl<K, V> ReadOnlyCache<K> for TwoQCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.pages.contains_key(key)
    }

    fn len(&self) -> usize {
        self.pages.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
