//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{LruHandle, LruList};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::CacheStore;
