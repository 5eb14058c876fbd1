//! Data Source Module
//!
//! The slow backing store the gateway shields. Only the fetch coordinator and
//! the create path talk to it.

mod simulated;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

pub use simulated::SimulatedDatabase;

// == Source Error ==
/// Failure reported by a data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The store could not be reached or refused the operation
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

// == Data Source ==
/// Abstract user store.
///
/// An absent user is `Ok(None)`, never an error.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Looks up a single user by id.
    async fn fetch_by_key(&self, id: u64) -> Result<Option<User>, SourceError>;

    /// Persists a new user and returns it with its assigned id.
    async fn create_user(&self, fields: NewUser) -> Result<User, SourceError>;
}
