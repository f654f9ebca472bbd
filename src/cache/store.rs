// In-memory TTL cache.
// Entries expire lazily: a lookup past the TTL evicts the entry and reports a miss.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Default freshness window: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Cached value with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, created_at: DateTime<Utc>) -> Self {
        Self { value, created_at }
    }

    /// An entry is fresh while `now - created_at <= ttl`. A creation time in
    /// the future (clock stepped back) counts as expired.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let elapsed = now
            .signed_duration_since(self.created_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }
}

/// Hit and miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Keyed store of values that go stale after a fixed TTL.
///
/// Unbounded: entries stay until they expire and are looked up again, are
/// purged, or the process exits. Safe to share behind an `Arc`; the lock is
/// only held for map operations, never across an await.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh value, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let expired = match entries.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => entry.is_expired(self.ttl, now),
        };

        if expired {
            entries.remove(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key, "cache entry expired");
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`, stamping it with the current time.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry::new(value, self.clock.now());
        self.entries().insert(key.into(), entry);
    }

    /// Drop `key`. Returns whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl, now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
