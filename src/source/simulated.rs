//! Simulated Database
//!
//! In-memory user table with artificial latency, used as the default backing
//! store and as the upstream in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tracing::debug;

use crate::models::{NewUser, User};
use crate::source::{DataSource, SourceError};

const SEED_USERS: [(&str, &str); 5] = [
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Charlie Brown", "charlie@example.com"),
    ("Diana Prince", "diana@example.com"),
    ("Evan Wright", "evan@example.com"),
];

// == Simulated Database ==
/// Slow in-memory user store.
#[derive(Debug)]
pub struct SimulatedDatabase {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
    latency: Duration,
    fetch_calls: AtomicU64,
    create_calls: AtomicU64,
    failing: AtomicBool,
}

impl SimulatedDatabase {
    // == Constructor ==
    /// Creates a store holding the seed users with ids 1 through 5.
    pub fn new(latency: Duration) -> Self {
        let now = Utc::now();
        let users = SEED_USERS
            .iter()
            .zip(1u64..)
            .map(|((name, email), id)| {
                let user = User {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    created_at: now,
                };
                (id, user)
            })
            .collect::<HashMap<_, _>>();
        let next_id = users.len() as u64 + 1;

        Self {
            users: RwLock::new(users),
            next_id: AtomicU64::new(next_id),
            latency,
            fetch_calls: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Creates a store with no users.
    pub fn empty(latency: Duration) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            latency,
            fetch_calls: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `fetch_by_key` calls that reached the store.
    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_user` calls that reached the store.
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn simulate_latency(&self) -> Result<(), SourceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable(
                "simulated database failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for SimulatedDatabase {
    async fn fetch_by_key(&self, id: u64) -> Result<Option<User>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        debug!(id, "database fetch");
        self.simulate_latency().await?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_user(&self, fields: NewUser) -> Result<User, SourceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await?;

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: fields.name,
            email: fields.email,
            created_at: Utc::now(),
        };
        debug!(id = user.id, "database insert");
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }
}
