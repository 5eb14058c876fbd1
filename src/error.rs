//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::source::SourceError;

// == Fetch Error ==
/// Outcome shared by every waiter of a coalesced fetch.
///
/// Must be `Clone` because one result fans out to many callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The data source failed; the next request retries
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// The coordinator is closing and no longer starts fetches
    #[error("fetch coordinator is shutting down")]
    ShutdownInProgress,
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> Self {
        FetchError::Upstream(err.to_string())
    }
}

// == Gateway Error Enum ==
/// Unified error type for the HTTP edge.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// User not found in the backing store
    #[error("User not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client exceeded its request budget
    #[error("Too many requests, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Backing store failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Gateway is shutting down
    #[error("Service is shutting down")]
    ShutdownInProgress,
}

impl From<FetchError> for GatewayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Upstream(msg) => GatewayError::Upstream(msg),
            FetchError::ShutdownInProgress => GatewayError::ShutdownInProgress,
        }
    }
}

impl From<SourceError> for GatewayError {
    fn from(err: SourceError) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::ShutdownInProgress => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            GatewayError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let mut response = (status, Json(ErrorResponse::new(self.to_string()))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
