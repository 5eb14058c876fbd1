//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStatsSnapshot;
use crate::coordinator::QueueStatus;
use crate::limiter::RateLimiterStats;
use crate::models::User;
use crate::service::{ServedFrom, UserLookup};

/// Response body for GET /users/:id and POST /users
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: User,
    /// "cache" or "database"
    pub source: ServedFrom,
}

impl From<UserLookup> for UserResponse {
    fn from(lookup: UserLookup) -> Self {
        Self {
            user: lookup.user,
            source: lookup.served_from,
        }
    }
}

impl UserResponse {
    /// A freshly created user always comes straight from the database.
    pub fn created(user: User) -> Self {
        Self {
            user,
            source: ServedFrom::Database,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStatsSnapshot,
    pub rate_limiter: RateLimiterStats,
    pub queue: QueueStatus,
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
}

impl ClearCacheResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache cleared successfully".to_string(),
        }
    }
}

impl Default for ClearCacheResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_reports_source() {
        let resp = UserResponse::from(UserLookup {
            user: user(),
            served_from: ServedFrom::Cache,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["source"], "cache");
        assert_eq!(json["user"]["name"], "Ada");

        let created = serde_json::to_value(UserResponse::created(user())).unwrap();
        assert_eq!(created["source"], "database");
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
