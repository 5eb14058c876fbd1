//! User Gateway - A caching, rate-limited front for a slow user store
//!
//! Lookups go through an expiring LRU cache, then a single-flight fetch
//! coordinator; every client is admitted by a dual-window rate limiter.

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod limiter;
pub mod models;
pub mod service;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::UserService;
pub use tasks::BackgroundTasks;
