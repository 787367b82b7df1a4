//! 2Q admission in action: one-hit wonders pass through A1in, a ghost hit
//! promotes into the main LRU.

use evictkit::policy::two_q::TwoQCache;
use evictkit::traits::ReadOnlyCache;

fn main() {
    let mut cache = TwoQCache::with_thresholds(3, 1, 2);

    for (key, value) in [("k1", 1), ("k2", 2), ("k3", 3), ("k4", 4)] {
        cache.insert(key, value);
    }

    println!("k1 resident: {}", cache.contains(&"k1"));
    println!("k1 remembered as ghost: {}", cache.ghost_contains(&"k1"));

    // the second reference proves k1 hot
    cache.insert("k1", 10);
    println!("k1 now lives in: {:?}", cache.location(&"k1"));
}
