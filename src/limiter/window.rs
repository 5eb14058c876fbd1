//! Client Window Module
//!
//! Per-client request timestamps for the sustained and burst windows.

use std::collections::VecDeque;

use tokio::time::{Duration, Instant};

// == Client Window ==
/// Admitted request timestamps for one client, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ClientWindow {
    /// Timestamps inside the sustained window
    requests: VecDeque<Instant>,
    /// Timestamps inside the burst window
    burst: VecDeque<Instant>,
}

impl ClientWindow {
    pub fn new() -> Self {
        Self::default()
    }

    // == Prune ==
    /// Drops timestamps that have fallen out of their respective window.
    pub fn prune(&mut self, now: Instant, window: Duration, burst_window: Duration) {
        prune_older_than(&mut self.requests, now, window);
        prune_older_than(&mut self.burst, now, burst_window);
    }

    // == Record ==
    /// Appends an admitted request to both windows.
    pub fn record(&mut self, now: Instant) {
        self.requests.push_back(now);
        self.burst.push_back(now);
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn burst_count(&self) -> usize {
        self.burst.len()
    }

    pub fn oldest_request(&self) -> Option<Instant> {
        self.requests.front().copied()
    }

    pub fn oldest_burst(&self) -> Option<Instant> {
        self.burst.front().copied()
    }

    /// True once both windows are empty; the record can then be dropped.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.burst.is_empty()
    }
}

/// Timestamps are appended in order, so pruning only ever pops the front.
fn prune_older_than(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
