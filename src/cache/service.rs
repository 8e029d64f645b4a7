//! Cache Service Module
//!
//! Read-through cache over any `KeyValueStore`. Values are stored as JSON.
//!
//! Store failures never reach callers of the collapsing operations (`get`,
//! `set`, `delete`, `delete_pattern`, `exists`, `get_or_set`): they are logged,
//! counted and turned into a miss or a no-op. `try_get` keeps the distinction
//! between a miss and an unavailable store for callers that need it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::stats::{CacheCounters, CacheStats};
use crate::cache::store::{KeyValueStore, StoreError};

// == Cache Service ==
/// Cheap-to-clone handle to a shared store.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    counters: Arc<CacheCounters>,
}

impl CacheService {
    // == Constructor ==
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            counters: Arc::new(CacheCounters::default()),
        }
    }

    // == Try Get ==
    /// Reads and decodes `key`.
    ///
    /// `Ok(None)` is a miss (absent, expired or undecodable); `Err` means the
    /// store could not be asked.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                self.counters.record_store_error();
                self.counters.record_miss();
                return Err(e);
            }
        };

        let Some(json) = raw else {
            debug!("Cache miss for key '{}'", key);
            self.counters.record_miss();
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!("Cache hit for key '{}'", key);
                self.counters.record_hit();
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Discarding undecodable cache value for key '{}': {}", key, e);
                self.counters.record_miss();
                Ok(None)
            }
        }
    }

    // == Get ==
    /// Reads `key`, collapsing store failures into `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for key '{}', treating as miss: {}", key, e);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` (at least one second).
    ///
    /// Returns whether the value was stored. Failures are logged only.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize cache value for key '{}': {}", key, e);
                return false;
            }
        };

        let ttl_secs = ttl.as_secs().max(1);
        match self.store.set_with_expiry(key, ttl_secs, json).await {
            Ok(()) => {
                debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
                self.counters.record_write();
                true
            }
            Err(e) => {
                warn!("Cache write failed for key '{}': {}", key, e);
                self.counters.record_store_error();
                false
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Absent keys and store failures are not errors.
    pub async fn delete(&self, key: &str) {
        match self.store.delete(&[key.to_string()]).await {
            Ok(removed) => self.counters.record_deletes(removed),
            Err(e) => {
                warn!("Cache delete failed for key '{}': {}", key, e);
                self.counters.record_store_error();
            }
        }
    }

    // == Delete Pattern ==
    /// Removes every key matching the glob `pattern` in a single batch.
    ///
    /// Returns the number of keys removed; no delete is issued when nothing
    /// matches.
    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        let keys = match self.store.list_keys(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Cache key listing failed for pattern '{}': {}", pattern, e);
                self.counters.record_store_error();
                return 0;
            }
        };

        if keys.is_empty() {
            debug!("No cache keys match pattern '{}'", pattern);
            return 0;
        }

        match self.store.delete(&keys).await {
            Ok(removed) => {
                debug!("Invalidated {} keys matching '{}'", removed, pattern);
                self.counters.record_deletes(removed);
                removed
            }
            Err(e) => {
                warn!("Cache batch delete failed for pattern '{}': {}", pattern, e);
                self.counters.record_store_error();
                0
            }
        }
    }

    // == Exists ==
    /// Checks for a live entry without decoding it. `false` if the store is down.
    pub async fn exists(&self, key: &str) -> bool {
        match self.store.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Cache exists check failed for key '{}': {}", key, e);
                self.counters.record_store_error();
                false
            }
        }
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, or runs `producer`, caches its
    /// output for `ttl` and returns it.
    ///
    /// The producer is not called on a hit. Its errors propagate and nothing is
    /// cached. Concurrent misses on the same key each run the producer; the last
    /// write wins.
    pub async fn get_or_set<T, E, F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = producer().await?;
        // A failed write only costs a recomputation on the next call.
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.store.backend_name())
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
