//! O(1)-LFU walkthrough: accesses climb the frequency ladder, eviction
//! always drains the minimum bucket.

use evictkit::policy::lfu::LfuCache;
use evictkit::traits::ReadOnlyCache;

fn main() {
    let mut cache = LfuCache::new(2);

    cache.insert("k1", "v1");
    cache.insert("k2", "v2");
    cache.access(&"k2");

    // k1 sits alone in the minimum bucket and is evicted
    cache.insert("k3", "v3");

    for key in ["k1", "k2", "k3"] {
        match cache.frequency(&key) {
            Some(freq) => println!("{key}: resident at frequency {freq}"),
            None => println!("{key}: evicted"),
        }
    }
    assert!(!cache.contains(&"k1"));
}
