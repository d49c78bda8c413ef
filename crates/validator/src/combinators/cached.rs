//! Outcome cache shared along a derivation chain
//!
//! A node created with [`Node::cached`](crate::Node::cached) owns a cache
//! storage that every same-typed node derived from it keeps sharing. Entries
//! are keyed by the deriving node's revision and description plus
//! `stage + ":" + fingerprint(candidate)`, so a refinement never reads an
//! outcome its base stored.

use crate::foundation::{Candidate, Outcome};
use crate::node::Output;
use std::fmt;
use std::sync::Arc;

/// Default cache capacity (1000 entries)
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

type CacheKey = (u64, Arc<str>, String);

/// Cached outcome (Arc-wrapped for cheap cloning).
type CachedOutcome<T> = Arc<Outcome<T>>;

/// Thread-safe outcome storage backed by `moka`.
pub struct OutcomeCache<T> {
    inner: Arc<moka::sync::Cache<CacheKey, CachedOutcome<T>>>,
}

impl<T> Clone for OutcomeCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Output> OutcomeCache<T> {
    /// Creates a cache holding at most `capacity` outcomes.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Arc::new(moka::sync::Cache::builder().max_capacity(capacity).build()),
        }
    }

    pub(crate) fn get(&self, revision: u64, description: &Arc<str>, key: &str) -> Option<Outcome<T>> {
        self.inner
            .get(&(revision, Arc::clone(description), key.to_owned()))
            .map(|hit| (*hit).clone())
    }

    pub(crate) fn insert(
        &self,
        revision: u64,
        description: &Arc<str>,
        key: String,
        outcome: Outcome<T>,
    ) {
        self.inner
            .insert((revision, Arc::clone(description), key), Arc::new(outcome));
    }

    /// Drops every entry of the chain.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entries: self.inner.entry_count(),
            capacity: self.inner.policy().max_capacity().unwrap_or(0),
        }
    }

    /// Whether two handles point at the same storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> fmt::Debug for OutcomeCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

/// Statistics about the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// The number of entries currently stored in the cache.
    pub entries: u64,
    /// The maximum number of entries the cache can hold.
    pub capacity: u64,
}

impl CacheStats {
    /// Returns the cache utilization as a fraction (0.0 to 1.0).
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.entries as f64 / self.capacity as f64
        }
    }
}

/// Cache key for a candidate evaluated on `stage`.
pub fn cache_key(stage: &str, candidate: &Candidate) -> String {
    format!("{stage}:{}", candidate.fingerprint())
}

// ============================================================================
// TESTS
// ============================================================================
