//! Rate Limiter Module
//!
//! Dual sliding-window admission control keyed by client identifier.

use std::collections::HashMap;

use serde::Serialize;
use tokio::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::limiter::ClientWindow;

// == Limit Window ==
/// Which window rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitWindow {
    Burst,
    Sustained,
}

// == Rate Limit Decision ==
/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left before either window rejects
    pub remaining: usize,
    /// When the client's budget recovers
    pub reset_at: Instant,
    /// Sustained budget, reported as the client's limit
    pub limit: usize,
    /// Set on denial
    pub limited_by: Option<LimitWindow>,
}

impl RateLimitDecision {
    /// Time until `reset_at`, zero if already passed.
    pub fn reset_in(&self, now: Instant) -> Duration {
        self.reset_at.saturating_duration_since(now)
    }

    /// Whole seconds a denied client should wait, rounded up.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let millis = self.reset_in(now).as_millis() as u64;
        millis.div_ceil(1000)
    }
}

// == Rate Limiter Stats ==
/// Configured thresholds and tracked-client count. No per-client data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimiterStats {
    pub max_requests: usize,
    pub window_secs: u64,
    pub burst_max: usize,
    pub burst_window_secs: u64,
    pub tracked_clients: usize,
}

// == Rate Limiter ==
/// Tracks a burst window and a sustained window per client.
#[derive(Debug)]
pub struct RateLimiter {
    clients: HashMap<String, ClientWindow>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            clients: HashMap::new(),
            config,
        }
    }

    // == Check Limit ==
    /// Admits or denies one request from `client_id`.
    ///
    /// The burst window is evaluated first so a client exceeding both limits
    /// gets the shorter retry hint. Denied requests are not recorded.
    pub fn check_limit(&mut self, client_id: &str) -> RateLimitDecision {
        let now = Instant::now();
        let config = self.config;
        let window = self
            .clients
            .entry(client_id.to_string())
            .or_default();
        window.prune(now, config.window, config.burst_window);

        if window.burst_count() >= config.burst_max {
            let oldest = window.oldest_burst().unwrap_or(now);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: oldest + config.burst_window,
                limit: config.max_requests,
                limited_by: Some(LimitWindow::Burst),
            };
        }

        if window.request_count() >= config.max_requests {
            let oldest = window.oldest_request().unwrap_or(now);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: oldest + config.window,
                limit: config.max_requests,
                limited_by: Some(LimitWindow::Sustained),
            };
        }

        window.record(now);
        let remaining = config
            .max_requests
            .saturating_sub(window.request_count())
            .min(config.burst_max.saturating_sub(window.burst_count()));

        RateLimitDecision {
            allowed: true,
            remaining,
            reset_at: now + config.window,
            limit: config.max_requests,
            limited_by: None,
        }
    }

    // == Cleanup Idle ==
    /// Drops clients with no timestamps left in either window.
    ///
    /// Returns the number of client records removed.
    pub fn cleanup_idle(&mut self) -> usize {
        let now = Instant::now();
        let config = self.config;
        let before = self.clients.len();

        self.clients.retain(|_, window| {
            window.prune(now, config.window, config.burst_window);
            !window.is_empty()
        });

        before - self.clients.len()
    }

    // == Stats ==
    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            max_requests: self.config.max_requests,
            window_secs: self.config.window.as_secs(),
            burst_max: self.config.burst_max,
            burst_window_secs: self.config.burst_window.as_secs(),
            tracked_clients: self.clients.len(),
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}
