//! Fetch Worker
//!
//! Drains the fetch queue one job at a time.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coordinator::status::Counters;
use crate::coordinator::{FetchResult, PendingFetch};
use crate::error::FetchError;
use crate::source::DataSource;

/// One queued upstream lookup.
pub(crate) struct Job {
    pub(crate) key: u64,
    pub(crate) reply: oneshot::Sender<FetchResult>,
}

/// State shared by the coordinator handles and the worker.
#[derive(Default)]
pub(crate) struct SharedState {
    pub(crate) in_flight: Mutex<HashMap<u64, PendingFetch>>,
    pub(crate) counters: Counters,
}

pub(crate) struct Worker {
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) state: Arc<SharedState>,
    pub(crate) jobs: mpsc::UnboundedReceiver<Job>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) pacing: Duration,
}

impl Worker {
    pub(crate) async fn run(mut self) {
        debug!(pacing_ms = self.pacing.as_millis() as u64, "fetch worker started");

        loop {
            let job = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                job = self.jobs.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };
            self.state.counters.waiting.fetch_sub(1, Ordering::SeqCst);

            process(self.source.as_ref(), &self.state, job).await;

            if !self.pacing.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(self.pacing) => {}
                }
            }
        }

        let abandoned = self.drain().await;
        info!(abandoned, "fetch worker stopped");
    }

    /// Fails every job that was queued but never started.
    async fn drain(&mut self) -> usize {
        self.jobs.close();
        let mut abandoned = 0;

        while let Ok(job) = self.jobs.try_recv() {
            self.state.counters.waiting.fetch_sub(1, Ordering::SeqCst);
            self.state.in_flight.lock().await.remove(&job.key);
            let _ = job.reply.send(Err(FetchError::ShutdownInProgress));
            abandoned += 1;
        }

        abandoned
    }
}

/// Runs one upstream call to completion. Shutdown never interrupts it.
async fn process(source: &dyn DataSource, state: &SharedState, job: Job) {
    let counters = &state.counters;
    counters.active.store(true, Ordering::SeqCst);

    let outcome = source
        .fetch_by_key(job.key)
        .await
        .map_err(FetchError::from);

    match &outcome {
        Ok(_) => {
            counters.processed.fetch_add(1, Ordering::SeqCst);
        }
        Err(err) => {
            counters.failed.fetch_add(1, Ordering::SeqCst);
            warn!(key = job.key, %err, "upstream fetch failed");
        }
    }

    // Clear the slot before waking waiters so any later call starts fresh.
    state.in_flight.lock().await.remove(&job.key);
    counters.active.store(false, Ordering::SeqCst);
    let _ = job.reply.send(outcome);
}
