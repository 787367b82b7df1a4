//! Read-side trait shared by every eviction engine.
//!
//! The four engines expose deliberately different mutation surfaces (SIEVE's
//! boolean `get`, LRU-K's byte-oriented `set`, 2Q's promoting `insert`,
//! LFU's panicking `access`), so there is no common write trait. What they do
//! share is the read-only view: residency, size, and configured capacity.

/// Read-only residency and sizing queries, implemented by all engines.
///
/// None of these methods touch eviction state: `contains` does not set
/// visited bits, bump frequencies, or update reference history.
///
/// # Example
///
/// ```
/// use evictkit::policy::sieve::SieveCache;
/// use evictkit::traits::ReadOnlyCache;
///
/// fn occupancy<K, C: ReadOnlyCache<K>>(cache: &C) -> f64 {
///     cache.len() as f64 / cache.capacity() as f64
/// }
///
/// let mut cache = SieveCache::new(4);
/// cache.insert("a", 1);
/// assert_eq!(occupancy(&cache), 0.25);
/// ```
pub trait ReadOnlyCache<K> {
    /// Returns `true` if `key` is currently resident.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of resident entries.
    fn capacity(&self) -> usize;
}
