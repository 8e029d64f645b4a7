//! Key-Value Store Capability
//!
//! The minimal contract the cache service needs from a backing store:
//! string keys, serialized string values, per-entry expiry and glob listing.

use async_trait::async_trait;
use thiserror::Error;

// == Store Error ==
/// Failure reported by a backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Connection refused, dropped or timed out
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed a command
    #[error("Store command failed: {0}")]
    Backend(String),

    /// A key pattern could not be interpreted
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Key Value Store ==
/// Capability implemented by every cache backend.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and expiry.
    async fn set_with_expiry(&self, key: &str, ttl_secs: u64, value: String) -> StoreResult<()>;

    /// Deletes every key in `keys` in one call. Absent keys are ignored.
    ///
    /// Returns the number of keys actually removed.
    async fn delete(&self, keys: &[String]) -> StoreResult<u64>;

    /// Lists the live keys matching a Redis-style glob pattern.
    async fn list_keys(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Checks whether `key` holds a live value.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Short backend name used in logs and stats.
    fn backend_name(&self) -> &'static str;
}
