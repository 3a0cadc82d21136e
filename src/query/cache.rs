// In-memory query cache.
// Stores JSON-encoded query results with their insertion time and stale time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

use super::key::QueryKey;

/// Stale time for the aggregated exam list: 1 hour.
pub const EXAM_LIST_TTL: Duration = Duration::from_secs(60 * 60);

/// Stale time for the user snapshot: 4 hours.
pub const USER_SNAPSHOT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Stale time for everything else: always re-fetch.
pub const DEFAULT_TTL: Duration = Duration::ZERO;

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// The cached data.
    pub data: Value,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
    /// How long the data stays fresh.
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: Value, ttl: Duration) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
            ttl,
        }
    }

    /// Check if this entry has outlived its TTL. A zero TTL is always stale,
    /// and so is an entry stamped in the future.
    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= self.ttl
    }

    pub fn is_fresh(&self) -> bool {
        !self.is_expired()
    }
}

/// Query results keyed by [`QueryKey`].
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CachedEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, CachedEntry>> {
        // A poisoned map is still structurally valid.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read a fresh entry. Expired entries are evicted and reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let data = {
            let mut entries = self.entries();
            let entry = entries.get(key)?;
            if entry.is_expired() {
                entries.remove(key);
                tracing::debug!(%key, "cache entry expired");
                return None;
            }
            entry.data.clone()
        };

        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%key, error = %e, "cached value has unexpected shape");
                self.invalidate(key);
                None
            }
        }
    }

    /// Get the raw entry, fresh or not.
    pub fn entry(&self, key: &QueryKey) -> Option<CachedEntry> {
        self.entries().get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// A zero `ttl` could never be served, so nothing is stored. Expired
    /// entries are pruned on every store.
    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            self.entries().remove(&key);
            return Ok(());
        }

        let data = serde_json::to_value(value)?;
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.is_fresh());
        entries.insert(key, CachedEntry::new(data, ttl));
        Ok(())
    }

    /// Remove one entry. Returns true if it existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Remove every entry whose key starts with `prefix`. Returns the count.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
