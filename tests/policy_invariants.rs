// ==============================================
// CROSS-ENGINE INVARIANT TESTS (integration)
// ==============================================
//
// Behavioral consistency checks that span all four engines. Anything tied to
// a single engine's mechanics lives in that engine's unit tests; these cover
// the contract every engine shares: the capacity bound, index/list
// agreement, and construction-time validation.

use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru_k::LrukCache;
use evictkit::policy::sieve::SieveCache;
use evictkit::policy::two_q::TwoQCache;
use evictkit::traits::ReadOnlyCache;

// ==============================================
// Capacity Bound
// ==============================================

#[test]
fn sieve_never_exceeds_capacity() {
    let mut cache: SieveCache<u32, u32> = SieveCache::new(4);
    for i in 0..64 {
        cache.insert(i, i);
        if i % 3 == 0 {
            cache.get(&(i / 2));
        }
        assert!(cache.len() <= cache.capacity());
        cache.debug_validate_invariants();
    }
}

#[test]
fn two_q_never_exceeds_capacity() {
    let mut cache: TwoQCache<u32, u32> = TwoQCache::with_thresholds(4, 1, 2);
    for i in 0..64 {
        cache.insert(i % 12, i);
        assert!(cache.len() <= cache.capacity());
        cache.debug_validate_invariants();
    }
}

#[test]
fn lfu_never_exceeds_capacity() {
    let mut cache: LfuCache<u32, u32> = LfuCache::new(4);
    for i in 0..64 {
        if cache.contains(&(i % 12)) {
            cache.access(&(i % 12));
        } else {
            cache.insert(i % 12, i);
        }
        assert!(cache.len() <= cache.capacity());
        cache.debug_validate_invariants();
    }
}

#[test]
fn lru_k_never_exceeds_capacity() {
    let cache: LrukCache<u32> = LrukCache::new(2, 4, 0);
    for i in 0..64u32 {
        cache.set(i % 12, vec![i as u8]);
        assert!(cache.len() <= cache.capacity());
    }
}

// ==============================================
// Zero-Capacity Construction
// ==============================================
//
// Every engine treats capacity 0 as fatal misuse in the panicking
// constructor and as ConfigError in the fallible one; none silently coerce
// to a minimum.

#[test]
fn zero_capacity_is_rejected_everywhere() {
    assert!(SieveCache::<u32, u32>::try_new(0).is_err());
    assert!(LfuCache::<u32, u32>::try_new(0).is_err());
    assert!(TwoQCache::<u32, u32>::try_with_thresholds(0, 1, 1).is_err());
    assert!(LrukCache::<u32>::try_new(2, 0, 1).is_err());
}

#[test]
fn valid_parameters_are_accepted_everywhere() {
    assert!(SieveCache::<u32, u32>::try_new(1).is_ok());
    assert!(LfuCache::<u32, u32>::try_new(1).is_ok());
    assert!(TwoQCache::<u32, u32>::try_with_thresholds(1, 1, 1).is_ok());
    assert!(LrukCache::<u32>::try_new(1, 1, 0).is_ok());
}

// ==============================================
// Read-Only Surface
// ==============================================

#[test]
fn contains_never_perturbs_eviction_state() {
    // SIEVE: contains must not set the visited bit, so the probed key is
    // still the sweep victim afterwards.
    let mut sieve: SieveCache<&str, i32> = SieveCache::new(2);
    sieve.insert("a", 1);
    sieve.insert("b", 2);
    assert!(sieve.contains(&"a"));
    sieve.insert("c", 3);
    assert!(!sieve.contains(&"a"));

    // LFU: contains must not bump the frequency.
    let mut lfu: LfuCache<&str, i32> = LfuCache::new(2);
    lfu.insert("a", 1);
    assert!(lfu.contains(&"a"));
    assert_eq!(lfu.frequency(&"a"), Some(1));

    // 2Q: peek and contains must not refresh Am recency.
    let mut two_q: TwoQCache<&str, i32> = TwoQCache::with_thresholds(3, 1, 2);
    two_q.insert("k1", 1);
    two_q.insert("k2", 2);
    assert!(two_q.contains(&"k1"));
    assert_eq!(two_q.peek(&"k1"), Some(&1));
    assert_eq!(two_q.debug_snapshot_a1in(), vec!["k2", "k1"]);
}

#[test]
fn read_only_trait_covers_every_engine() {
    fn describe<K, C: ReadOnlyCache<K>>(cache: &C) -> (usize, usize, bool) {
        (cache.len(), cache.capacity(), cache.is_empty())
    }

    let mut sieve: SieveCache<u32, u32> = SieveCache::new(3);
    sieve.insert(1, 1);
    assert_eq!(describe(&sieve), (1, 3, false));

    let lru_k: LrukCache<u32> = LrukCache::new(2, 5, 0);
    assert_eq!(describe(&lru_k), (0, 5, true));

    let mut two_q: TwoQCache<u32, u32> = TwoQCache::new(4);
    two_q.insert(1, 1);
    assert_eq!(describe(&two_q), (1, 4, false));

    let mut lfu: LfuCache<u32, u32> = LfuCache::new(2);
    lfu.insert(1, 1);
    assert_eq!(describe(&lfu), (1, 2, false));
}
