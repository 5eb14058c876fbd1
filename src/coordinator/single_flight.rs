//! Single-Flight Fetch Coordinator
//!
//! Collapses concurrent lookups for the same key into one upstream call and
//! fans the outcome out to every waiter.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::coordinator::worker::{Job, SharedState, Worker};
use crate::coordinator::{FetchResult, QueueStatus};
use crate::error::FetchError;
use crate::source::DataSource;

// == Fetch Coordinator ==
/// Handle to the single-flight fetch queue. Cheap to clone.
///
/// Jobs are drained by one background worker, so the data source sees at
/// most one call at a time and never two concurrent calls for the same key.
#[derive(Clone)]
pub struct FetchCoordinator {
    state: Arc<SharedState>,
    queue: mpsc::UnboundedSender<Job>,
    shutdown: CancellationToken,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl FetchCoordinator {
    // == Constructor ==
    /// Creates the coordinator and spawns its worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(source: Arc<dyn DataSource>, config: CoordinatorConfig) -> Self {
        let state = Arc::new(SharedState::default());
        let (queue, jobs) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let worker = Worker {
            source,
            state: Arc::clone(&state),
            jobs,
            shutdown: shutdown.clone(),
            pacing: config.pacing,
        };
        let handle = tokio::spawn(worker.run());

        Self {
            state,
            queue,
            shutdown,
            worker: Arc::new(Mutex::new(Some(handle))),
        }
    }

    // == Fetch ==
    /// Looks up `key` through the data source, joining an outstanding fetch
    /// for the same key if there is one.
    ///
    /// Every caller joined to one fetch observes the identical outcome.
    /// Failures are not remembered: the next call after a failure starts a
    /// new upstream call.
    pub async fn fetch(&self, key: u64) -> FetchResult {
        let pending = {
            let mut in_flight = self.state.in_flight.lock().await;
            if self.shutdown.is_cancelled() {
                return Err(FetchError::ShutdownInProgress);
            }

            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(key, "joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    let (reply, receiver) = oneshot::channel();
                    let counters = &self.state.counters;
                    counters.waiting.fetch_add(1, Ordering::SeqCst);
                    if self.queue.send(Job { key, reply }).is_err() {
                        counters.waiting.fetch_sub(1, Ordering::SeqCst);
                        return Err(FetchError::ShutdownInProgress);
                    }

                    debug!(key, "queued upstream fetch");
                    let pending = receiver.shared();
                    in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };

        // A dropped reply means the worker is gone.
        pending
            .await
            .unwrap_or(Err(FetchError::ShutdownInProgress))
    }

    // == Queue Status ==
    /// Snapshot of queue depth and lifetime counters.
    pub async fn queue_status(&self) -> QueueStatus {
        let in_flight = self.state.in_flight.lock().await.len();
        self.state.counters.snapshot(in_flight)
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    // == Shutdown ==
    /// Stops the worker.
    ///
    /// The fetch already running finishes normally; queued fetches and any
    /// call made afterwards fail with `ShutdownInProgress`. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(%err, "fetch worker ended abnormally");
            }
            info!("fetch coordinator shut down");
        }
    }
}
