use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::node_arena::{NodeArena, NodeId};
use crate::ds::sentinel_list::SentinelList;

#[derive(Debug)]
struct Bucket {
    freq: u64,
    // per-bucket entry list, most recently promoted at the head
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl Bucket {
    fn new(freq: u64) -> Self {
        Self {
            freq,
            head: None,
            tail: None,
            len: 0,
        }
    }
}

#[derive(Debug)]
struct Entry<K> {
    key: K,
    bucket: NodeId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Frequency-bucket list with O(1) insert, promote, and min eviction.
///
/// Buckets form a [`SentinelList`] kept in strictly increasing reference
/// count, so the minimum-frequency bucket is always the node after HEAD. A
/// bucket that loses its last entry is unlinked immediately; no empty bucket
/// is ever reachable. Each entry holds a back-handle to its bucket, keeping
/// promotion to the `freq + 1` bucket a pure splice.
///
/// Within a bucket, entries are ordered most recently promoted first, and
/// [`pop_min`](FreqLadder::pop_min) takes the bucket's oldest entry. Keys are
/// tracked here only; callers keep value storage.
#[derive(Debug)]
pub struct FreqLadder<K> {
    chain: SentinelList<Bucket>,
    entries: NodeArena<Entry<K>>,
    index: FxHashMap<K, NodeId>,
}

impl<K> FreqLadder<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            chain: SentinelList::new(),
            entries: NodeArena::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Reference count of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let bucket = self.entries.get(id)?.bucket;
        self.chain.get(bucket).map(|b| b.freq)
    }

    /// Smallest reference count currently tracked.
    pub fn min_freq(&self) -> Option<u64> {
        let first = self.chain.front_id()?;
        self.chain.get(first).map(|b| b.freq)
    }

    /// The entry [`pop_min`](Self::pop_min) would remove, without removing it.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        let first = self.chain.front_id()?;
        let bucket = self.chain.get(first)?;
        let victim = bucket.tail?;
        self.entries.get(victim).map(|e| (&e.key, bucket.freq))
    }

    /// Tracks a new key at frequency 1. Returns `false` if already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let bucket_id = self.first_bucket_at_one();
        let entry_id = self.entries.alloc(Entry {
            key: key.clone(),
            bucket: bucket_id,
            prev: None,
            next: None,
        });
        self.entry_push_front(bucket_id, entry_id);
        self.index.insert(key, entry_id);
        true
    }

    /// Moves `key` to the `freq + 1` bucket, creating it if absent.
    ///
    /// Returns the new reference count, or `None` if the key is not tracked.
    pub fn promote(&mut self, key: &K) -> Option<u64> {
        let entry_id = *self.index.get(key)?;
        let bucket_id = self.entries.get(entry_id)?.bucket;
        let freq = self.chain.get(bucket_id)?.freq;

        if freq == u64::MAX {
            // counter saturated; refresh recency within the bucket
            self.entry_detach(bucket_id, entry_id);
            self.entry_push_front(bucket_id, entry_id);
            return Some(freq);
        }

        let after = self
            .chain
            .next_id(bucket_id)
            .expect("bucket chain broken after live bucket");
        let target = if self.chain.get(after).map(|b| b.freq) == Some(freq + 1) {
            after
        } else {
            self.chain.insert_between(bucket_id, after, Bucket::new(freq + 1))
        };

        self.entry_detach(bucket_id, entry_id);
        self.unlink_if_drained(bucket_id);
        if let Some(entry) = self.entries.get_mut(entry_id) {
            entry.bucket = target;
        }
        self.entry_push_front(target, entry_id);
        Some(freq + 1)
    }

    /// Stops tracking `key`; returns its final reference count.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let entry_id = self.index.remove(key)?;
        let bucket_id = self.entries.get(entry_id)?.bucket;
        let freq = self.chain.get(bucket_id)?.freq;

        self.entry_detach(bucket_id, entry_id);
        self.unlink_if_drained(bucket_id);
        self.entries.free(entry_id);
        Some(freq)
    }

    /// Removes and returns the oldest entry of the minimum-frequency bucket.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let bucket_id = self.chain.front_id()?;
        let bucket = self.chain.get(bucket_id)?;
        let freq = bucket.freq;
        let victim = bucket.tail?;

        self.entry_detach(bucket_id, victim);
        self.unlink_if_drained(bucket_id);
        let entry = self.entries.free(victim)?;
        self.index.remove(&entry.key);
        Some((entry.key, freq))
    }

    pub fn clear(&mut self) {
        self.chain.clear();
        self.entries.clear();
        self.index.clear();
    }

    /// Bucket with `freq == 1`, creating it right after HEAD if missing.
    fn first_bucket_at_one(&mut self) -> NodeId {
        match self.chain.front_id() {
            Some(first) if self.chain.get(first).map(|b| b.freq) == Some(1) => first,
            first => {
                let next = first.unwrap_or_else(|| self.chain.tail_id());
                self.chain
                    .insert_between(self.chain.head_id(), next, Bucket::new(1))
            },
        }
    }

    fn unlink_if_drained(&mut self, bucket_id: NodeId) {
        if self.chain.get(bucket_id).map(|b| b.len) == Some(0) {
            self.chain.unlink(bucket_id);
        }
    }

    fn entry_push_front(&mut self, bucket_id: NodeId, entry_id: NodeId) {
        let old_head = {
            let bucket = self
                .chain
                .get_mut(bucket_id)
                .expect("push into unlinked bucket");
            let old = bucket.head;
            bucket.head = Some(entry_id);
            if old.is_none() {
                bucket.tail = Some(entry_id);
            }
            bucket.len += 1;
            old
        };
        if let Some(entry) = self.entries.get_mut(entry_id) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old) = old_head {
            if let Some(entry) = self.entries.get_mut(old) {
                entry.prev = Some(entry_id);
            }
        }
    }

    fn entry_detach(&mut self, bucket_id: NodeId, entry_id: NodeId) {
        let (prev, next) = {
            let entry = self.entries.get(entry_id).expect("detach of freed entry");
            (entry.prev, entry.next)
        };

        if let Some(prev_id) = prev {
            if let Some(entry) = self.entries.get_mut(prev_id) {
                entry.next = next;
            }
        }
        if let Some(next_id) = next {
            if let Some(entry) = self.entries.get_mut(next_id) {
                entry.prev = prev;
            }
        }
        if let Some(bucket) = self.chain.get_mut(bucket_id) {
            if bucket.head == Some(entry_id) {
                bucket.head = next;
            }
            if bucket.tail == Some(entry_id) {
                bucket.tail = prev;
            }
            bucket.len -= 1;
        }
        if let Some(entry) = self.entries.get_mut(entry_id) {
            entry.prev = None;
            entry.next = None;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.chain.debug_validate_invariants();
        assert_eq!(self.entries.len(), self.index.len());

        let mut last_freq = 0u64;
        let mut total = 0usize;
        for bucket_id in self.chain.iter_ids().collect::<Vec<_>>() {
            let bucket = self.chain.get(bucket_id).expect("bucket vanished");
            assert!(bucket.freq > last_freq, "bucket freqs not strictly increasing");
            assert!(bucket.len > 0, "empty bucket left linked");
            last_freq = bucket.freq;

            let mut current = bucket.head;
            let mut prev = None;
            let mut count = 0usize;
            while let Some(id) = current {
                let entry = self.entries.get(id).expect("bucket entry missing");
                assert_eq!(entry.bucket, bucket_id);
                assert_eq!(entry.prev, prev);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                prev = Some(id);
                current = entry.next;
                count += 1;
            }
            assert_eq!(bucket.tail, prev);
            assert_eq!(count, bucket.len);
            total += count;
        }
        assert_eq!(total, self.entries.len());
    }
}

impl<K> Default for FreqLadder<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_promote_pop_flow() {
        let mut ladder = FreqLadder::new();
        assert!(ladder.insert("a"));
        assert!(ladder.insert("b"));

        assert_eq!(ladder.frequency(&"a"), Some(1));
        assert_eq!(ladder.min_freq(), Some(1));

        assert_eq!(ladder.promote(&"a"), Some(2));
        assert_eq!(ladder.frequency(&"a"), Some(2));
        assert_eq!(ladder.min_freq(), Some(1));

        assert_eq!(ladder.pop_min(), Some(("b", 1)));
        assert_eq!(ladder.min_freq(), Some(2));
        ladder.debug_validate_invariants();
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut ladder = FreqLadder::new();
        assert!(ladder.insert("a"));
        assert!(!ladder.insert("a"));
        assert_eq!(ladder.len(), 1);
    }

    #[test]
    fn promote_missing_returns_none() {
        let mut ladder: FreqLadder<&str> = FreqLadder::new();
        assert_eq!(ladder.promote(&"missing"), None);
        assert!(ladder.is_empty());
    }

    #[test]
    fn drained_buckets_are_unlinked() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.promote(&"a");
        ladder.promote(&"a");
        // only the freq-3 bucket remains
        assert_eq!(ladder.min_freq(), Some(3));
        ladder.debug_validate_invariants();

        assert_eq!(ladder.remove(&"a"), Some(3));
        assert_eq!(ladder.min_freq(), None);
        ladder.debug_validate_invariants();
    }

    #[test]
    fn promotion_lands_in_existing_next_bucket() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.insert("b");
        ladder.promote(&"a");

        // "b" joins "a" in the freq-2 bucket rather than a new one
        assert_eq!(ladder.promote(&"b"), Some(2));
        assert_eq!(ladder.frequency(&"a"), Some(2));
        assert_eq!(ladder.frequency(&"b"), Some(2));
        assert_eq!(ladder.min_freq(), Some(2));
        ladder.debug_validate_invariants();
    }

    #[test]
    fn pop_min_takes_oldest_within_bucket() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.insert("b");
        ladder.insert("c");

        assert_eq!(ladder.pop_min(), Some(("a", 1)));
        assert_eq!(ladder.pop_min(), Some(("b", 1)));
        assert_eq!(ladder.pop_min(), Some(("c", 1)));
        assert_eq!(ladder.pop_min(), None);
    }

    #[test]
    fn peek_min_does_not_remove() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.insert("b");
        ladder.promote(&"b");

        assert_eq!(ladder.peek_min(), Some((&"a", 1)));
        assert_eq!(ladder.len(), 2);
    }

    #[test]
    fn remove_updates_min_freq() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.insert("b");
        ladder.promote(&"b");

        assert_eq!(ladder.remove(&"a"), Some(1));
        assert_eq!(ladder.min_freq(), Some(2));
        assert_eq!(ladder.remove(&"missing"), None);
        ladder.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_state() {
        let mut ladder = FreqLadder::new();
        ladder.insert("a");
        ladder.promote(&"a");
        ladder.clear();
        assert!(ladder.is_empty());
        assert_eq!(ladder.min_freq(), None);
        assert_eq!(ladder.pop_min(), None);
        assert!(ladder.insert("a"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Invariants hold and frequencies match a naive reference model
        /// under arbitrary insert/promote/remove/pop sequences.
        #[test]
        fn prop_matches_reference_counts(
            ops in prop::collection::vec((0u8..4, 0u32..12), 0..120)
        ) {
            let mut ladder: FreqLadder<u32> = FreqLadder::new();
            let mut model: std::collections::HashMap<u32, u64> = Default::default();

            for (op, key) in ops {
                match op {
                    0 => {
                        let fresh = ladder.insert(key);
                        prop_assert_eq!(fresh, !model.contains_key(&key));
                        model.entry(key).or_insert(1);
                    }
                    1 => {
                        let promoted = ladder.promote(&key);
                        match model.get_mut(&key) {
                            Some(freq) => {
                                *freq += 1;
                                prop_assert_eq!(promoted, Some(*freq));
                            }
                            None => prop_assert_eq!(promoted, None),
                        }
                    }
                    2 => {
                        let removed = ladder.remove(&key);
                        prop_assert_eq!(removed, model.remove(&key));
                    }
                    _ => {
                        if let Some((popped, freq)) = ladder.pop_min() {
                            let expected_min = model.values().copied().min().unwrap();
                            prop_assert_eq!(freq, expected_min);
                            prop_assert_eq!(model.remove(&popped), Some(freq));
                        } else {
                            prop_assert!(model.is_empty());
                        }
                    }
                }
                prop_assert_eq!(ladder.len(), model.len());
                ladder.debug_validate_invariants();
            }
        }
    }
}
