//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! request latency.

use serde::Serialize;
use tokio::time::Duration;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in the cache
    pub size: usize,
    /// Number of lookups served through the cache
    pub total_requests: u64,
    /// Accumulated lookup latency in milliseconds
    pub total_response_time_ms: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Average Response Time ==
    /// Mean lookup latency in milliseconds, or 0.0 before the first request.
    pub fn average_response_time_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_response_time_ms / self.total_requests as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Record Request ==
    /// Counts one completed lookup and its latency.
    pub fn record_request(&mut self, elapsed: Duration) {
        self.total_requests += 1;
        self.total_response_time_ms += elapsed.as_secs_f64() * 1000.0;
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}

// == Stats Snapshot ==
/// Read-only projection of [`CacheStats`] exposed to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub size: usize,
    pub max_size: usize,
    pub hit_rate: f64,
    pub total_requests: u64,
    pub average_response_time_ms: f64,
}

impl CacheStatsSnapshot {
    pub fn new(stats: &CacheStats, max_size: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            size: stats.size,
            max_size,
            hit_rate: stats.hit_rate(),
            total_requests: stats.total_requests,
            average_response_time_ms: stats.average_response_time_ms(),
        }
    }
}
