//! Periodic Cleanup Tasks
//!
//! Background sweeps that bound memory independently of request traffic:
//! expired cache entries and idle rate-limiter clients.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::limiter::RateLimiter;

/// Spawns a task that removes expired cache entries every `interval`.
///
/// The sweep takes the cache's write lock, the same one foreground lookups
/// use, and does not touch hit/miss counters. Once `shutdown` is cancelled
/// no further sweep runs.
pub fn spawn_cache_sweep<K, V>(
    cache: Arc<RwLock<CacheStore<K, V>>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting cache TTL sweep with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }

        debug!("Cache TTL sweep stopped");
    })
}

/// Spawns a task that forgets rate-limiter clients with empty windows.
pub fn spawn_limiter_sweep(
    limiter: Arc<Mutex<RateLimiter>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting rate limiter sweep with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let (removed, remaining) = {
                let mut limiter_guard = limiter.lock().await;
                let removed = limiter_guard.cleanup_idle();
                (removed, limiter_guard.tracked_clients())
            };

            if removed > 0 {
                info!(
                    "Rate limiter sweep: dropped {} idle clients, {} still tracked",
                    removed, remaining
                );
            } else {
                debug!("Rate limiter sweep: no idle clients");
            }
        }

        debug!("Rate limiter sweep stopped");
    })
}
