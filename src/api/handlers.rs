//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::limiter::RateLimiter;
use crate::models::{
    ClearCacheResponse, CreateUserRequest, HealthResponse, StatsResponse, UserResponse,
};
use crate::service::UserService;
use crate::source::SimulatedDatabase;

/// Application state shared across all handlers.
///
/// The cache, the limiter and the in-flight map each sit behind their own
/// lock; no handler holds more than one at a time.
#[derive(Clone)]
pub struct AppState {
    /// Cache, coordinator and data source
    pub service: Arc<UserService>,
    /// Per-client admission control
    pub limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    /// Creates a new AppState from its components.
    pub fn new(service: UserService, limiter: RateLimiter) -> Self {
        Self {
            service: Arc::new(service),
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Creates a new AppState from configuration, backed by the simulated
    /// database.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        let source = Arc::new(SimulatedDatabase::new(config.source_latency()));
        let service = UserService::new(
            source,
            &config.cache_config(),
            config.coordinator_config(),
        );
        let limiter = RateLimiter::new(config.rate_limit_config());
        Self::new(service, limiter)
    }
}

/// Handler for GET /users/:id
///
/// Serves from the cache, or through the single-flight coordinator on a miss.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let id: u64 = id
        .parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("Invalid user id '{}'", id)))?;

    match state.service.get_user(id).await? {
        Some(lookup) => Ok(Json(lookup.into())),
        None => Err(GatewayError::NotFound(id.to_string())),
    }
}

/// Handler for POST /users
///
/// Creation is never deduplicated; the new user is cached on success.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }

    let user = state.service.create_user(req.into_new_user()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::created(user))))
}

/// Handler for GET /stats
///
/// Returns cache, rate limiter and fetch queue snapshots.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.service.cache_stats().await;
    let queue = state.service.queue_status().await;
    let rate_limiter = state.limiter.lock().await.stats();

    Json(StatsResponse {
        cache,
        rate_limiter,
        queue,
    })
}

/// Handler for DELETE /cache
///
/// Drops every cached user and resets the cache counters.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    state.service.clear_cache().await;
    Json(ClearCacheResponse::new())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
