//! Minimal SIEVE walkthrough: reads set the visited bit, the sweep spares
//! marked entries once.

use evictkit::policy::sieve::SieveCache;
use evictkit::traits::ReadOnlyCache;

fn main() {
    let mut cache = SieveCache::new(3);

    cache.insert("alpha", 1);
    cache.insert("beta", 2);
    cache.insert("gamma", 3);

    // mark alpha so it survives the next sweep
    assert!(cache.get(&"alpha"));

    cache.insert("delta", 4);

    println!("resident after one eviction:");
    for key in ["alpha", "beta", "gamma", "delta"] {
        println!("  {key:>5}: {}", cache.contains(&key));
    }
}
