//! Rate Limiter Module
//!
//! Per-client admission control using a short burst window and a longer
//! sustained window.

mod rate_limiter;
mod window;


pub use rate_limiter::{LimitWindow, RateLimitDecision, RateLimiter, RateLimiterStats};
pub use window::ClientWindow;
