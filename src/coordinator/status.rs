//! Queue Status Module
//!
//! Counters shared between the coordinator handle and its worker.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;

/// Worker-side counters. Lock free so `queue_status` never contends with fetches.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) processed: AtomicU64,
    pub(crate) failed: AtomicU64,
    pub(crate) waiting: AtomicUsize,
    pub(crate) active: AtomicBool,
}

impl Counters {
    pub(crate) fn snapshot(&self, in_flight: usize) -> QueueStatus {
        let waiting = self.waiting.load(Ordering::SeqCst);
        let active = self.active.load(Ordering::SeqCst);
        QueueStatus {
            waiting,
            in_flight,
            active,
            processed: self.processed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            pending: waiting + usize::from(active),
        }
    }
}

// == Queue Status ==
/// Read-only view of the fetch queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Jobs queued but not yet started
    pub waiting: usize,
    /// Distinct keys with an outstanding fetch (queued or running)
    pub in_flight: usize,
    /// Whether the worker is currently calling the data source
    pub active: bool,
    /// Fetches that completed successfully
    pub processed: u64,
    /// Fetches that failed upstream
    pub failed: u64,
    /// Jobs not yet finished (waiting plus the running one)
    pub pending: usize,
}
