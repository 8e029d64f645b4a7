//! Memory Store Module
//!
//! Process-local `KeyValueStore` backed by a HashMap with per-entry expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::cache::pattern::KeyPattern;
use crate::cache::store::{KeyValueStore, StoreResult};

// == Memory Store ==
/// In-memory store with lazy and periodic expiry.
///
/// When `max_entries` is reached, inserting a new key evicts the live entry
/// closest to expiring.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remaining lifetime of `key` in milliseconds, if it is live.
    #[cfg(test)]
    pub async fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        let now = current_timestamp_ms();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(CacheEntry::ttl_remaining_ms)
    }

    fn evict_one(entries: &mut HashMap<String, CacheEntry>, now: u64) {
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        if entries.len() < before {
            return;
        }

        let victim = entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            debug!("Memory store full, evicting '{}'", key);
            entries.remove(&key);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = current_timestamp_ms();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: purge under the write lock, re-checking in case it was rewritten.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_expiry(&self, key: &str, ttl_secs: u64, value: String) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            Self::evict_one(&mut entries, current_timestamp_ms());
        }
        entries.insert(key.to_string(), CacheEntry::new(value, ttl_secs));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if let Some(entry) = entries.remove(key) {
                if !entry.is_expired_at(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn list_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let matcher = KeyPattern::compile(pattern)?;
        let now = current_timestamp_ms();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && matcher.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let now = current_timestamp_ms();
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now)))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
