//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /users/:id` - Look up a user (rate limited)
//! - `POST /users` - Create a user (rate limited)
//! - `GET /stats` - Cache, rate limiter and fetch queue statistics
//! - `DELETE /cache` - Clear the user cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
