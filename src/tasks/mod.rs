//! Background Tasks Module
//!
//! Contains background tasks that run periodically during gateway operation.
//!
//! # Tasks
//! - Cache sweep: Removes expired cache entries at configured intervals
//! - Limiter sweep: Forgets clients with no recent requests

mod cleanup;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::AppState;
use crate::config::{CacheConfig, RateLimitConfig};

pub use cleanup::{spawn_cache_sweep, spawn_limiter_sweep};

/// Owns the periodic sweeps so they stop together on shutdown.
#[derive(Debug)]
pub struct BackgroundTasks {
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Starts the cache and rate limiter sweeps for `state`.
    pub fn spawn(
        state: &AppState,
        cache_config: &CacheConfig,
        rate_limit_config: &RateLimitConfig,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let handles = vec![
            spawn_cache_sweep(
                state.service.cache(),
                cache_config.sweep_interval,
                shutdown.child_token(),
            ),
            spawn_limiter_sweep(
                state.limiter.clone(),
                rate_limit_config.sweep_interval,
                shutdown.child_token(),
            ),
        ];

        Self { shutdown, handles }
    }

    /// Cancels every sweep and waits for them to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for handle in self.handles {
            if let Err(err) = handle.await {
                warn!(%err, "background task ended abnormally");
            }
        }
        info!("Background tasks stopped");
    }
}
