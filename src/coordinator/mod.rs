//! Fetch Coordinator Module
//!
//! Single-flight deduplication in front of the data source.
//!
//! # Flow
//! - First miss for a key queues a job and registers a shared pending result
//! - Later callers for that key await the same pending result
//! - The worker runs the job, clears the registration, then publishes the outcome

mod single_flight;
mod status;
mod worker;

use futures::future::Shared;
use tokio::sync::oneshot;

use crate::error::FetchError;
use crate::models::User;

pub use single_flight::FetchCoordinator;
pub use status::QueueStatus;

/// Outcome of one upstream lookup. `Ok(None)` means the user does not exist.
pub type FetchResult = std::result::Result<Option<User>, FetchError>;

/// Shared handle every waiter of one fetch awaits.
pub(crate) type PendingFetch = Shared<oneshot::Receiver<FetchResult>>;
