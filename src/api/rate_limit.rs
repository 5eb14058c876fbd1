//! Rate Limit Middleware
//!
//! Gates requests through the dual-window limiter before any handler runs
//! and reports the client's budget in response headers.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tokio::time::Instant;
use tracing::warn;

use crate::api::AppState;
use crate::error::GatewayError;
use crate::limiter::RateLimitDecision;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Middleware for rate-limited routes.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let decision = {
        let mut limiter = state.limiter.lock().await;
        let client = client_id(&request, limiter.config().trust_forwarded);
        let decision = limiter.check_limit(&client);
        if !decision.allowed {
            warn!(
                client = %client,
                window = ?decision.limited_by,
                "rate limit exceeded"
            );
        }
        decision
    };
    let now = Instant::now();

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        let retry_after_secs = decision.retry_after_secs(now);
        GatewayError::RateLimited { retry_after_secs }.into_response()
    };

    apply_headers(response.headers_mut(), &decision, now);
    response
}

/// Identifies the caller by peer address.
///
/// `X-Forwarded-For` is client-controlled, so its first address is used only
/// when `trust_forwarded` is set.
pub fn client_id(request: &Request, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = request
            .headers()
            .get(X_FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(addr) = forwarded {
            return addr.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Writes the limit, remaining and reset headers.
///
/// The reset header is a Unix timestamp in seconds. `Retry-After` comes from
/// the `RateLimited` error response.
pub fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision, now: Instant) {
    let reset_in = decision.reset_in(now);
    let reset_at = Utc::now()
        + chrono::Duration::from_std(reset_in).unwrap_or_else(|_| chrono::Duration::zero());

    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at.timestamp()));
}
