//! LRU-K cache replacement policy with correlated-reference filtering.
//!
//! Tracks the timestamps of the last K uncorrelated references to each page
//! and evicts the resident page whose K-th most recent reference lies
//! furthest in the past (largest backward K-distance). Two refinements from
//! the classical formulation are carried:
//!
//! - **Correlated Reference Period (CRP)**: references closer than CRP
//!   seconds to the previous reference are treated as one logical reference
//!   and only refresh `LAST`, never the history. Pages inside a correlated
//!   burst are also ineligible as eviction victims.
//! - **Retained Information Period (RIP)**: reference history outlives the
//!   page itself, so a page that ages out and returns shortly afterwards is
//!   recognized as hot. A background sweeper drops history no longer
//!   justified under the retention criterion.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │  LrukCache<K>        (single engine-wide parking_lot::Mutex)  │
//!   │                                                               │
//!   │   buffer: FxHashMap<K, Vec<u8>>   resident payloads           │
//!   │   hist:   FxHashMap<K, Vec<i64>>  last K uncorrelated refs,   │
//!   │                                   index 0 newest, K-1 oldest  │
//!   │   last:   FxHashMap<K, i64>       most recent reference       │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! History survives eviction (`hist` keeps the block, `buffer`/`last` drop)
//! until the sweeper retires it. Timestamps are unix seconds.
//!
//! ## Reads
//!
//! `get` is a pure read: it does **not** update `hist` or `last`. Only `set`
//! records references, matching the reference formulation of the policy.
//!
//! ## Concurrency
//!
//! All state sits behind one mutex; `get` and `set` are single critical
//! sections. The sweeper re-acquires the lock per key so a long sweep never
//! stalls foreground traffic, and it holds only a weak handle to the engine,
//! exiting on its next tick once the last strong handle is dropped.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru_k::LrukCache;
//!
//! let cache: LrukCache<String> = LrukCache::new(2, 128, 5);
//! assert!(cache.set("page".to_string(), b"payload".to_vec()));
//! assert_eq!(cache.get(&"page".to_string()), Some(b"payload".to_vec()));
//! ```
//!
//! ## Academic Reference
//!
//! O'Neil, E. J., O'Neil, P. E., & Weikum, G. (1993).
//! "The LRU-K page replacement algorithm for database disk buffering."
//! ACM SIGMOD Record, 22(2), 297-306.

use std::hash::Hash;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::ConfigError;
use crate::traits::ReadOnlyCache;

/// Default sweep cadence for the retained-information purge.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(120);

/// Default retained-information period, in seconds.
pub const DEFAULT_RIP_SECS: i64 = 3600;

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[derive(Debug)]
struct LrukState<K> {
    buffer: FxHashMap<K, Vec<u8>>,
    hist: FxHashMap<K, Vec<i64>>,
    last: FxHashMap<K, i64>,
}

impl<K> LrukState<K>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self {
            buffer: FxHashMap::default(),
            hist: FxHashMap::default(),
            last: FxHashMap::default(),
        }
    }

    fn last_of(&self, key: &K) -> i64 {
        *self
            .last
            .get(key)
            .expect("LAST missing for a resident page")
    }

    fn hist_at(&self, key: &K, index: usize) -> i64 {
        self.hist
            .get(key)
            .expect("HIST missing for a tracked page")[index]
    }

    fn hist_set(&mut self, key: &K, index: usize, time: i64) {
        self.hist
            .get_mut(key)
            .expect("HIST missing for a tracked page")[index] = time;
    }

    /// Shifts the history right by one slot, crediting `correl` seconds to
    /// every retained timestamp. Walks ascending so each slot reads the
    /// value just written to its predecessor, as in the reference
    /// formulation.
    fn shift_hist(&mut self, key: &K, k: usize, correl: i64) {
        for i in 1..k {
            let prev = self.hist_at(key, i - 1);
            self.hist_set(key, i, prev + correl);
        }
    }

    /// Resident page minimizing `HIST[K-1]`, excluding pages whose latest
    /// reference falls inside the correlated period.
    fn victim_at(&self, k: usize, crp: i64, t: i64) -> Option<K> {
        let mut min = t;
        let mut victim = None;
        for page in self.buffer.keys() {
            let last = self.last_of(page);
            let oldest = self.hist_at(page, k - 1);
            if t - last > crp && oldest < min {
                min = oldest;
                victim = Some(page.clone());
            }
        }
        victim
    }

    fn set_at(&mut self, k: usize, crp: i64, capacity: usize, key: K, data: Vec<u8>, t: i64) -> bool {
        if self.buffer.contains_key(&key) {
            let last = self.last_of(&key);
            if t - last > crp {
                // uncorrelated: close the burst and open a new history slot
                let correl = last - self.hist_at(&key, 0);
                self.shift_hist(&key, k, correl);
                self.hist_set(&key, 0, t);
            }
            self.last.insert(key.clone(), t);
            self.buffer.insert(key, data);
            return true;
        }

        if self.buffer.len() >= capacity {
            let Some(victim) = self.victim_at(k, crp, t) else {
                // every resident page is mid-burst; reject rather than
                // overflow the buffer
                return false;
            };
            self.buffer.remove(&victim);
            self.last.remove(&victim);
            // victim history is retained for the information period

            if self.hist.contains_key(&key) {
                // recently evicted and back within the retained period
                self.shift_hist(&key, k, 0);
            } else {
                self.hist.insert(key.clone(), vec![0; k]);
            }
        } else {
            self.hist.insert(key.clone(), vec![0; k]);
        }

        self.hist_set(&key, 0, t);
        self.last.insert(key.clone(), t);
        self.buffer.insert(key, data);
        true
    }

    fn drop_page(&mut self, key: &K) {
        self.buffer.remove(key);
        self.hist.remove(key);
        self.last.remove(key);
    }
}

/// Bounded byte-payload cache evicting by backward K-distance.
///
/// Thread-safe: every operation serializes on the engine mutex. Clone an
/// `Arc<LrukCache<K>>` to share between threads and to start the sweeper.
#[derive(Debug)]
pub struct LrukCache<K> {
    k: usize,
    capacity: usize,
    crp: i64,
    rip: i64,
    cleanup_interval: Duration,
    state: Mutex<LrukState<K>>,
}

impl<K> LrukCache<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K engine tracking `k` references per page.
    ///
    /// `crp` is the correlated reference period in seconds. The retained
    /// information period and sweep cadence start at
    /// [`DEFAULT_RIP_SECS`] / [`DEFAULT_CLEANUP_INTERVAL`]; adjust them with
    /// [`with_rip`](Self::with_rip) and
    /// [`with_cleanup_interval`](Self::with_cleanup_interval) before sharing
    /// the engine.
    ///
    /// # Panics
    ///
    /// Panics if `k` or `capacity` is zero, or `crp` is negative.
    pub fn new(k: usize, capacity: usize, crp: i64) -> Self {
        assert!(k > 0, "k must be greater than zero");
        assert!(capacity > 0, "capacity must be greater than zero");
        assert!(crp >= 0, "correlated reference period must not be negative");
        Self {
            k,
            capacity,
            crp,
            rip: DEFAULT_RIP_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            state: Mutex::new(LrukState::new()),
        }
    }

    /// Fallible constructor for caller-supplied parameters.
    pub fn try_new(k: usize, capacity: usize, crp: i64) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::new("k must be greater than zero"));
        }
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        if crp < 0 {
            return Err(ConfigError::new(
                "correlated reference period must not be negative",
            ));
        }
        Ok(Self::new(k, capacity, crp))
    }

    /// Sets the retained information period, in seconds.
    pub fn with_rip(mut self, rip: i64) -> Self {
        self.rip = rip;
        self
    }

    /// Sets how often the background sweeper runs.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Number of references tracked per page.
    pub fn k_value(&self) -> usize {
        self.k
    }

    /// Correlated reference period, in seconds.
    pub fn crp(&self) -> i64 {
        self.crp
    }

    /// Retained information period, in seconds.
    pub fn rip(&self) -> i64 {
        self.rip
    }

    /// Returns the stored bytes if `key` is resident.
    ///
    /// Pure read: reference history is not updated. Only [`set`](Self::set)
    /// records references.
    pub fn get(&self, key: &K) -> Option<Vec<u8>> {
        self.state.lock().buffer.get(key).cloned()
    }

    /// Records a reference to `key` and stores `data`.
    ///
    /// Returns `false` only when the buffer is full and every resident page
    /// is inside a correlated burst, in which case nothing is admitted.
    pub fn set(&self, key: K, data: Vec<u8>) -> bool {
        self.set_at(key, data, unix_now())
    }

    fn set_at(&self, key: K, data: Vec<u8>, t: i64) -> bool {
        self.state
            .lock()
            .set_at(self.k, self.crp, self.capacity, key, data, t)
    }

    /// Drops `key` along with its history and last-reference record.
    ///
    /// Silent no-op for keys that are not tracked.
    pub fn cleanup(&self, key: &K) {
        self.state.lock().drop_page(key);
    }

    /// Snapshot of the reference history for `key`, newest first.
    pub fn history(&self, key: &K) -> Option<Vec<i64>> {
        self.state.lock().hist.get(key).cloned()
    }

    /// One retained-information sweep at time `t`.
    ///
    /// Resident pages whose backward K-distance exceeds RIP are dropped
    /// entirely; history blocks of non-resident pages are retired once their
    /// newest reference is older than RIP. The engine lock is released
    /// between key inspections.
    fn sweep_at(&self, t: i64) {
        let resident: Vec<K> = {
            let state = self.state.lock();
            state.buffer.keys().cloned().collect()
        };
        for key in resident {
            let mut state = self.state.lock();
            if !state.buffer.contains_key(&key) {
                continue;
            }
            let Some(hist) = state.hist.get(&key) else {
                continue;
            };
            if t - hist[self.k - 1] > self.rip {
                state.drop_page(&key);
            }
        }

        let retired: Vec<K> = {
            let state = self.state.lock();
            state
                .hist
                .iter()
                .filter(|(key, hist)| {
                    !state.buffer.contains_key(*key) && t - hist[0] > self.rip
                })
                .map(|(key, _)| key.clone())
                .collect()
        };
        for key in retired {
            let mut state = self.state.lock();
            if !state.buffer.contains_key(&key) {
                state.hist.remove(&key);
                state.last.remove(&key);
            }
        }
    }
}

impl<K> LrukCache<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// Spawns the retained-information sweeper.
    ///
    /// Call on a cloned handle: `Arc::clone(&cache).start_cleanup()`. The
    /// thread sleeps for the configured interval between sweeps and holds
    /// only a weak handle to the engine, so it exits on its next tick after
    /// the last strong handle is dropped.
    pub fn start_cleanup(self: Arc<Self>) -> thread::JoinHandle<()> {
        let engine = Arc::downgrade(&self);
        let interval = self.cleanup_interval;
        thread::Builder::new()
            .name("lruk-sweeper".into())
            .spawn(move || loop {
                thread::sleep(interval);
                match engine.upgrade() {
                    Some(cache) => cache.sweep_at(unix_now()),
                    None => break,
                }
            })
            .expect("failed to spawn sweeper thread")
    }
}

impl<K> ReadOnlyCache<K> for LrukCache<K>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.state.lock().buffer.contains_key(key)
    }

    fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
