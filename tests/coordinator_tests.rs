//! Integration Tests for Fetch Coalescing
//!
//! Concurrent lookups, failure fan-out and shutdown behavior observed
//! through the public coordinator and service APIs.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use user_gateway::{
    config::{CacheConfig, CoordinatorConfig},
    coordinator::FetchCoordinator,
    error::FetchError,
    models::NewUser,
    service::ServedFrom,
    source::SimulatedDatabase,
    UserService,
};

const LATENCY: Duration = Duration::from_millis(200);

// == Helper Functions ==

fn database() -> Arc<SimulatedDatabase> {
    Arc::new(SimulatedDatabase::new(LATENCY))
}

fn coordinator(db: &Arc<SimulatedDatabase>) -> FetchCoordinator {
    FetchCoordinator::new(db.clone(), CoordinatorConfig::default())
}

// == Coalescing Tests ==

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_upstream_call() {
    let db = database();
    let coordinator = coordinator(&db);

    let results = join_all((0..10).map(|_| coordinator.fetch(3))).await;

    assert_eq!(db.fetch_calls(), 1);
    let first = results[0].clone().unwrap().unwrap();
    assert_eq!(first.id, 3);
    assert!(results.iter().all(|r| r == &Ok(Some(first.clone()))));

    let status = coordinator.queue_status().await;
    assert_eq!(status.processed, 1);
    assert_eq!(status.in_flight, 0);
    assert_eq!(status.pending, 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_failure() {
    let db = database();
    let coordinator = coordinator(&db);
    db.set_failing(true);

    let results = join_all((0..5).map(|_| coordinator.fetch(1))).await;

    assert_eq!(db.fetch_calls(), 1);
    assert!(results
        .iter()
        .all(|r| matches!(r, Err(FetchError::Upstream(_)))));
    assert_eq!(coordinator.queue_status().await.failed, 1);

    db.set_failing(false);
    assert!(coordinator.fetch(1).await.unwrap().is_some());
    assert_eq!(db.fetch_calls(), 2, "failures are not remembered");
}

#[tokio::test(start_paused = true)]
async fn test_distinct_keys_are_fetched_separately() {
    let db = database();
    let coordinator = coordinator(&db);

    let results = join_all([1, 2, 3, 1, 2, 3].map(|key| coordinator.fetch(key))).await;

    assert_eq!(db.fetch_calls(), 3);
    assert_eq!(results[0], results[3]);
    assert_ne!(results[0], results[1]);
}

#[tokio::test(start_paused = true)]
async fn test_service_coalesces_cache_misses() {
    let db = database();
    let service = Arc::new(UserService::new(
        db.clone(),
        &CacheConfig::default(),
        CoordinatorConfig::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get_user(2).await })
        })
        .collect();
    for handle in handles {
        let lookup = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(lookup.user.id, 2);
    }

    assert_eq!(db.fetch_calls(), 1);
    let lookup = service.get_user(2).await.unwrap().unwrap();
    assert_eq!(lookup.served_from, ServedFrom::Cache);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_creates_are_not_deduplicated() {
    let db = database();
    let service = UserService::new(
        db.clone(),
        &CacheConfig::default(),
        CoordinatorConfig::default(),
    );

    let payloads = [
        NewUser::new("Grace Hopper", "grace@example.com"),
        NewUser::new("Alan Turing", "alan@example.com"),
        NewUser::new("Ada Lovelace", "ada@example.com"),
    ];

    let results = join_all(
        payloads
            .iter()
            .cloned()
            .map(|fields| service.create_user(fields)),
    )
    .await;

    assert_eq!(db.create_calls(), 3);
    let users: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    for (user, fields) in users.iter().zip(&payloads) {
        assert_eq!(user.name, fields.name);
        assert_eq!(user.email, fields.email);
    }

    let mut ids: Vec<u64> = users.iter().map(|user| user.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

// == Pacing Tests ==

#[tokio::test(start_paused = true)]
async fn test_pacing_spaces_out_upstream_calls() {
    let db = database();
    let coordinator = FetchCoordinator::new(
        db.clone(),
        CoordinatorConfig {
            pacing: Duration::from_secs(1),
        },
    );

    let started = tokio::time::Instant::now();
    let results = join_all([1, 2, 3].map(|key| coordinator.fetch(key))).await;

    assert!(results.iter().all(|r| matches!(r, Ok(Some(_)))));
    assert!(started.elapsed() >= LATENCY * 3 + Duration::from_secs(2));
}

// == Shutdown Tests ==

#[tokio::test(start_paused = true)]
async fn test_shutdown_finishes_running_job_and_fails_queued_ones() {
    let db = database();
    let coordinator = coordinator(&db);

    let handles: Vec<_> = [1, 2, 3]
        .into_iter()
        .map(|key| {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.fetch(key).await })
        })
        .collect();

    // Let all three enqueue and the worker start on the first.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let status = coordinator.queue_status().await;
    assert!(status.active);
    assert_eq!(status.waiting, 2);
    assert_eq!(status.pending, 3);

    coordinator.shutdown().await;

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert!(matches!(results[0], Ok(Some(ref user)) if user.id == 1));
    assert_eq!(results[1], Err(FetchError::ShutdownInProgress));
    assert_eq!(results[2], Err(FetchError::ShutdownInProgress));
    assert_eq!(db.fetch_calls(), 1);

    assert_eq!(coordinator.fetch(4).await, Err(FetchError::ShutdownInProgress));
    assert!(coordinator.is_shutdown());

    // Idempotent
    coordinator.shutdown().await;
}
