//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned by fallible `try_…` constructors when an
//!   engine parameter is invalid (zero capacity, zero K, zero A1in bound).
//! - [`InvariantError`]: Returned by debug-only `check_invariants` methods
//!   when internal structure invariants are violated.
//!
//! Fatal misuse (duplicate LFU insert, access on a missing LFU key, evicting
//! from an empty LFU cache) panics instead; those are programming bugs, not
//! recoverable conditions.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::ConfigError;
//! use evictkit::policy::two_q::TwoQCache;
//!
//! let cache: Result<TwoQCache<String, i32>, ConfigError> =
//!     TwoQCache::try_with_thresholds(100, 25, 50);
//! assert!(cache.is_ok());
//!
//! let bad = TwoQCache::<String, i32>::try_with_thresholds(0, 25, 50);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when an engine is constructed with invalid parameters.
///
/// Produced by the `try_…` constructors on every engine, e.g.
/// [`SieveCache::try_new`](crate::policy::sieve::SieveCache::try_new).
/// Carries a human-readable description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when an internal structure invariant does not hold.
///
/// Produced by debug-only validation paths. The panicking
/// `debug_validate_invariants` methods are the usual entry point in tests;
/// this type exists for callers that want to report rather than abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
