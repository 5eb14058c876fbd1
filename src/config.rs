//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of users the cache can hold
    pub cache_max_size: usize,
    /// Cache entry lifetime in seconds
    pub cache_ttl: u64,
    /// Cache TTL sweep interval in seconds
    pub cache_sweep_interval: u64,
    /// Sustained window budget per client
    pub rate_limit_max_requests: usize,
    /// Sustained window length in seconds
    pub rate_limit_window: u64,
    /// Burst window budget per client
    pub rate_limit_burst_max: usize,
    /// Burst window length in seconds
    pub rate_limit_burst_window: u64,
    /// Idle client sweep interval in seconds
    pub rate_limit_sweep_interval: u64,
    /// Key clients on `X-Forwarded-For` instead of the peer address
    pub rate_limit_trust_forwarded: bool,
    /// Simulated latency of the backing store in milliseconds
    pub source_latency_ms: u64,
    /// Delay between fetch queue dequeues in milliseconds (0 = none)
    pub queue_pacing_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

/// Expiring LRU cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_size: usize,
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

/// Dual-window rate limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
    pub burst_max: usize,
    pub burst_window: Duration,
    pub sweep_interval: Duration,
    /// Only enable behind a proxy that overwrites `X-Forwarded-For`
    pub trust_forwarded: bool,
}

/// Fetch coordinator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Pause between dequeues of the serialized fetch worker
    pub pacing: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cached users (default: 100)
    /// - `CACHE_TTL_SECS` - Cache entry lifetime (default: 60)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - TTL sweep frequency (default: 10)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Sustained budget (default: 10)
    /// - `RATE_LIMIT_WINDOW_SECS` - Sustained window (default: 60)
    /// - `RATE_LIMIT_BURST_MAX` - Burst budget (default: 5)
    /// - `RATE_LIMIT_BURST_WINDOW_SECS` - Burst window (default: 10)
    /// - `RATE_LIMIT_SWEEP_INTERVAL_SECS` - Idle client sweep frequency (default: 60)
    /// - `RATE_LIMIT_TRUST_FORWARDED` - Identify clients by `X-Forwarded-For` (default: false)
    /// - `SOURCE_LATENCY_MS` - Simulated store latency (default: 200)
    /// - `QUEUE_PACING_MS` - Delay between queued fetches (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_size: env_or("CACHE_MAX_SIZE", defaults.cache_max_size),
            cache_ttl: env_or("CACHE_TTL_SECS", defaults.cache_ttl),
            cache_sweep_interval: env_or(
                "CACHE_SWEEP_INTERVAL_SECS",
                defaults.cache_sweep_interval,
            ),
            rate_limit_max_requests: env_or(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window: env_or("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit_window),
            rate_limit_burst_max: env_or("RATE_LIMIT_BURST_MAX", defaults.rate_limit_burst_max),
            rate_limit_burst_window: env_or(
                "RATE_LIMIT_BURST_WINDOW_SECS",
                defaults.rate_limit_burst_window,
            ),
            rate_limit_sweep_interval: env_or(
                "RATE_LIMIT_SWEEP_INTERVAL_SECS",
                defaults.rate_limit_sweep_interval,
            ),
            rate_limit_trust_forwarded: env_or(
                "RATE_LIMIT_TRUST_FORWARDED",
                defaults.rate_limit_trust_forwarded,
            ),
            source_latency_ms: env_or("SOURCE_LATENCY_MS", defaults.source_latency_ms),
            queue_pacing_ms: env_or("QUEUE_PACING_MS", defaults.queue_pacing_ms),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_size: self.cache_max_size,
            ttl: Duration::from_secs(self.cache_ttl),
            sweep_interval: Duration::from_secs(self.cache_sweep_interval),
        }
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit_max_requests,
            window: Duration::from_secs(self.rate_limit_window),
            burst_max: self.rate_limit_burst_max,
            burst_window: Duration::from_secs(self.rate_limit_burst_window),
            sweep_interval: Duration::from_secs(self.rate_limit_sweep_interval),
            trust_forwarded: self.rate_limit_trust_forwarded,
        }
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            pacing: Duration::from_millis(self.queue_pacing_ms),
        }
    }

    pub fn source_latency(&self) -> Duration {
        Duration::from_millis(self.source_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_size: 100,
            cache_ttl: 60,
            cache_sweep_interval: 10,
            rate_limit_max_requests: 10,
            rate_limit_window: 60,
            rate_limit_burst_max: 5,
            rate_limit_burst_window: 10,
            rate_limit_sweep_interval: 60,
            rate_limit_trust_forwarded: false,
            source_latency_ms: 200,
            queue_pacing_ms: 0,
            server_port: 3000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Config::default().cache_config()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Config::default().rate_limit_config()
    }
}

/// Reads and parses `name`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_size, 100);
        assert_eq!(config.cache_ttl, 60);
        assert_eq!(config.cache_sweep_interval, 10);
        assert_eq!(config.rate_limit_max_requests, 10);
        assert_eq!(config.rate_limit_burst_max, 5);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_component_configs() {
        let config = Config::default();

        let cache = config.cache_config();
        assert_eq!(cache.max_size, 100);
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert!(cache.sweep_interval < cache.ttl);

        let limits = config.rate_limit_config();
        assert_eq!(limits.window, Duration::from_secs(60));
        assert_eq!(limits.burst_window, Duration::from_secs(10));
        assert!(!limits.trust_forwarded, "forwarded headers are opt-in");

        assert_eq!(config.coordinator_config().pacing, Duration::ZERO);
        assert_eq!(config.source_latency(), Duration::from_millis(200));
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("USER_GATEWAY_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("USER_GATEWAY_TEST_GARBAGE", 7u64), 7);

        env::set_var("USER_GATEWAY_TEST_VALID", "42");
        assert_eq!(env_or("USER_GATEWAY_TEST_VALID", 7u64), 42);

        env::set_var("USER_GATEWAY_TEST_FLAG", "true");
        assert!(env_or("USER_GATEWAY_TEST_FLAG", false));

        env::remove_var("USER_GATEWAY_TEST_UNSET");
        assert_eq!(env_or("USER_GATEWAY_TEST_UNSET", 7u64), 7);
    }
}
