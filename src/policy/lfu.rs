//! O(1) LFU cache replacement policy.
//!
//! Every resident key lives in a frequency bucket; buckets are chained in
//! strictly increasing reference count, so the minimum-frequency bucket is
//! always the first one and insert, access, and evict are all O(1). The
//! bucket bookkeeping itself lives in [`FreqLadder`]; this engine adds value
//! storage, the capacity bound, and the misuse contract.
//!
//! ## Misuse contract
//!
//! Unlike the other engines, the LFU surface treats protocol violations as
//! programming bugs and panics:
//!
//! - [`insert`](LfuCache::insert) with a key that is already resident
//! - [`access`](LfuCache::access) for a key that is not resident
//! - [`evict`](LfuCache::evict) on an empty cache
//!
//! Callers that cannot guarantee the protocol should check
//! [`contains`](crate::traits::ReadOnlyCache::contains) first.
//!
//! ## Tie-breaking
//!
//! Within the minimum-frequency bucket the victim is the entry that reached
//! the bucket earliest, so eviction among equal counts is deterministic
//! FIFO rather than arbitrary.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lfu::LfuCache;
//!
//! let mut cache = LfuCache::new(2);
//! cache.insert("k1", 1);
//! cache.insert("k2", 2);
//! assert_eq!(cache.access(&"k2"), &2);   // k2 rises to frequency 2
//!
//! cache.insert("k3", 3);                 // k1 is the minimum, evicted
//! assert_eq!(cache.frequency(&"k3"), Some(1));
//! assert_eq!(cache.frequency(&"k2"), Some(2));
//! ```

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::freq_ladder::FreqLadder;
use crate::error::ConfigError;
use crate::traits::ReadOnlyCache;

/// Bounded cache evicting the least frequently used entry in O(1).
#[derive(Debug)]
pub struct LfuCache<K, V> {
    ladder: FreqLadder<K>,
    values: FxHashMap<K, V>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        Self {
            ladder: FreqLadder::new(),
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
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

    /// Inserts a fresh key at frequency 1, evicting first if full.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already resident.
    pub fn insert(&mut self, key: K, value: V) {
        assert!(
            !self.values.contains_key(&key),
            "insert of a key that is already resident"
        );
        if self.values.len() == self.capacity {
            self.evict();
        }
        self.ladder.insert(key.clone());
        self.values.insert(key, value);
    }

    /// References `key`, moving it up one frequency bucket.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not resident.
    pub fn access(&mut self, key: &K) -> &V {
        self.ladder
            .promote(key)
            .unwrap_or_else(|| panic!("access of a key that is not resident"));
        self.values
            .get(key)
            .expect("value missing for a tracked key")
    }

    /// Removes and returns an entry from the minimum-frequency bucket.
    ///
    /// Among equal counts the entry that reached the bucket earliest goes
    /// first.
    ///
    /// # Panics
    ///
    /// Panics if the cache is empty.
    pub fn evict(&mut self) -> (K, V) {
        let (key, _freq) = self
            .ladder
            .pop_min()
            .unwrap_or_else(|| panic!("evict from an empty cache"));
        let value = self
            .values
            .remove(&key)
            .expect("value missing for a tracked key");
        (key, value)
    }

    /// Returns the stored value without touching its frequency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Reference count of `key`, if resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.ladder.frequency(key)
    }

    /// Smallest reference count currently resident.
    pub fn min_frequency(&self) -> Option<u64> {
        self.ladder.min_freq()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.ladder.clear();
        self.values.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.ladder.debug_validate_invariants();
        assert_eq!(self.ladder.len(), self.values.len());
        assert!(self.values.len() <= self.capacity);
        for key in self.values.keys() {
            assert!(self.ladder.contains(key), "value stored for untracked key");
        }
    }
}

impl<K, V> ReadOnlyCache<K> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Capacity holds, bucket structure stays valid, and frequencies
        /// track a reference count model under guarded random traffic.
        #[test]
        fn prop_counts_and_capacity(
            capacity in 1usize..6,
            ops in prop::collection::vec((0u8..3, 0u32..10), 0..120)
        ) {
            let mut cache: LfuCache<u32, u32> = LfuCache::new(capacity);
            let mut counts: std::collections::HashMap<u32, u64> = Default::default();

            for (op, key) in ops {
                match op {
                    0 => {
                        if !cache.contains(&key) {
                            if cache.len() == capacity {
                                let (victim, _) = cache.evict();
                                counts.remove(&victim);
                            }
                            cache.insert(key, key);
                            counts.insert(key, 1);
                        }
                    }
                    1 => {
                        if cache.contains(&key) {
                            prop_assert_eq!(cache.access(&key), &key);
                            *counts.get_mut(&key).unwrap() += 1;
                        }
                    }
                    _ => {
                        if !cache.is_empty() {
                            let min = counts.values().copied().min().unwrap();
                            let (victim, _) = cache.evict();
                            prop_assert_eq!(counts.remove(&victim), Some(min));
                        }
                    }
                }
                prop_assert!(cache.len() <= capacity);
                for (key, &count) in &counts {
                    prop_assert_eq!(cache.frequency(key), Some(count));
                }
                cache.debug_validate_invariants();
            }
        }
    }
}
