//! Cache Module
//!
//! Read-through caching over a pluggable key-value store, plus the key and
//! TTL policy shared by the dashboard and marketing services.

mod entry;
pub mod keys;
mod memory;
mod pattern;
mod redis_store;
mod service;
mod stats;
mod store;
pub mod ttl;


// Re-export public types
pub use memory::MemoryStore;
pub use pattern::{escape_glob, KeyPattern};
pub use redis_store::RedisStore;
pub use service::CacheService;
pub use stats::{CacheCounters, CacheStats};
pub use store::{KeyValueStore, StoreError, StoreResult};
