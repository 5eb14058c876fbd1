//! User Service
//!
//! Composes the cache, the fetch coordinator and the data source into the
//! lookup and create paths. Rate limiting happens before this layer.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheStatsSnapshot, CacheStore};
use crate::config::{CacheConfig, CoordinatorConfig};
use crate::coordinator::{FetchCoordinator, QueueStatus};
use crate::error::FetchError;
use crate::models::{NewUser, User};
use crate::source::{DataSource, SourceError};

/// Shared handle to the user cache.
pub type UserCache = Arc<RwLock<CacheStore<u64, User>>>;

// == Served From ==
/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServedFrom {
    Cache,
    Database,
}

// == User Lookup ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLookup {
    pub user: User,
    pub served_from: ServedFrom,
}

// == User Service ==
pub struct UserService {
    cache: UserCache,
    coordinator: FetchCoordinator,
    source: Arc<dyn DataSource>,
}

impl UserService {
    // == Constructor ==
    /// Builds the cache and the coordinator around `source`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        source: Arc<dyn DataSource>,
        cache_config: &CacheConfig,
        coordinator_config: CoordinatorConfig,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(CacheStore::from_config(cache_config))),
            coordinator: FetchCoordinator::new(Arc::clone(&source), coordinator_config),
            source,
        }
    }

    // == Get User ==
    /// Cache first; on a miss the lookup goes through the single-flight
    /// coordinator and a found user is written back into the cache.
    ///
    /// `Ok(None)` means the user does not exist. Absent results are not cached.
    pub async fn get_user(&self, id: u64) -> Result<Option<UserLookup>, FetchError> {
        let started = Instant::now();

        let cached = self.cache.write().await.get(&id);
        let result = match cached {
            Some(user) => {
                debug!(id, "cache hit");
                Ok(Some(UserLookup {
                    user,
                    served_from: ServedFrom::Cache,
                }))
            }
            None => {
                debug!(id, "cache miss");
                self.load_user(id).await
            }
        };

        self.cache.write().await.record_request(started.elapsed());
        result
    }

    async fn load_user(&self, id: u64) -> Result<Option<UserLookup>, FetchError> {
        let Some(user) = self.coordinator.fetch(id).await? else {
            return Ok(None);
        };

        self.cache.write().await.set(id, user.clone());
        Ok(Some(UserLookup {
            user,
            served_from: ServedFrom::Database,
        }))
    }

    // == Create User ==
    /// Always a fresh call to the data source; never deduplicated.
    /// The new user is cached immediately.
    pub async fn create_user(&self, fields: NewUser) -> Result<User, SourceError> {
        let user = self.source.create_user(fields).await?;
        self.cache.write().await.set(user.id, user.clone());
        debug!(id = user.id, "created user");
        Ok(user)
    }

    // == Observability ==
    pub async fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.read().await.stats()
    }

    pub async fn queue_status(&self) -> QueueStatus {
        self.coordinator.queue_status().await
    }

    // == Clear Cache ==
    /// Administrative reset: drops every entry and zeroes the cache counters.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        cache.reset_stats();
    }

    pub fn cache(&self) -> UserCache {
        Arc::clone(&self.cache)
    }

    // == Shutdown ==
    /// Stops the fetch coordinator. Queued lookups fail with `ShutdownInProgress`.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }
}
