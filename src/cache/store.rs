//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU ordering and TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, CacheStatsSnapshot, LruHandle, LruList};
use crate::config::CacheConfig;

#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    handle: LruHandle,
}

// == Cache Store ==
/// Expiring LRU cache.
///
/// Size is always the number of distinct keys in the map; it is never
/// tracked separately.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, Slot<V>>,
    /// Recency order, least recently used first
    lru: LruList<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Lifetime of every entry
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruList::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.ttl)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, and marks it most recently
    /// used. Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        let ttl = self.ttl;

        let Some(slot) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if slot.entry.is_expired(ttl, now) {
            let handle = slot.handle;
            self.entries.remove(key);
            self.lru.remove(handle);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        slot.entry.touch(now);
        let value = slot.entry.value.clone();
        self.lru.move_to_back(slot.handle);
        self.stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// An existing key has its value and timestamps replaced and becomes most
    /// recently used. A new key arriving at capacity first evicts the least
    /// recently used entry, so the size never exceeds the capacity.
    pub fn set(&mut self, key: K, value: V) {
        let now = Instant::now();

        if let Some(slot) = self.entries.get_mut(&key) {
            slot.entry = CacheEntry::new(value, now);
            self.lru.move_to_back(slot.handle);
            return;
        }

        if self.entries.len() >= self.max_size {
            if let Some(evicted) = self.lru.pop_front() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        let handle = self.lru.push_back(key.clone());
        self.entries.insert(
            key,
            Slot {
                entry: CacheEntry::new(value, now),
                handle,
            },
        );
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(slot) => {
                self.lru.remove(slot.handle);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are left untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Reset Stats ==
    /// Zeroes every counter.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
    }

    // == Record Request ==
    /// Accounts one completed lookup served through this cache.
    pub fn record_request(&mut self, elapsed: Duration) {
        self.stats.record_request(elapsed);
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStatsSnapshot {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        CacheStatsSnapshot::new(&stats, self.max_size)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries without touching hit/miss counters.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let expired: Vec<LruHandle> = self
            .entries
            .values()
            .filter(|slot| slot.entry.is_expired(ttl, now))
            .map(|slot| slot.handle)
            .collect();

        for handle in &expired {
            if let Some(key) = self.lru.remove(*handle) {
                self.entries.remove(&key);
            }
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Peek ==
    /// Returns the entry for `key` without counting a hit or touching recency.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key).map(|slot| &slot.entry)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> + '_ {
        self.lru.iter()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}
