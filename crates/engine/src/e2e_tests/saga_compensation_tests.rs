//! E2E tests for creation saga compensation.
//!
//! A store decorator fails one step of the saga; the earlier records must be
//! gone afterwards and nothing may be announced.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roster_domain::events::SUBJECT_CREATED;
use roster_domain::{CharacterId, OwnerId, Position, Stats};
use tokio_util::sync::CancellationToken;

use super::{thane, E2ETestContext};
use crate::infrastructure::ports::{PositionRepo, RepoError, StatsRepo};
use crate::use_cases::character::{SagaOutcome, SagaStep};

/// Stats store whose `create` always fails, remembering the id it was given.
struct FailingStats {
    inner: Arc<dyn StatsRepo>,
    attempted: Mutex<Option<CharacterId>>,
}

#[async_trait]
impl StatsRepo for FailingStats {
    async fn create(&self, stats: &Stats) -> Result<(), RepoError> {
        *self.attempted.lock().unwrap() = Some(stats.character_id);
        Err(RepoError::database("create_stats", "disk I/O error"))
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Stats>, RepoError> {
        self.inner.get(character_id).await
    }

    async fn update(&self, stats: &Stats) -> Result<(), RepoError> {
        self.inner.update(stats).await
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.inner.delete(character_id).await
    }
}

/// Position store that refuses every write.
struct ReadOnlyPositions {
    inner: Arc<dyn PositionRepo>,
}

#[async_trait]
impl PositionRepo for ReadOnlyPositions {
    async fn create(&self, _position: &Position) -> Result<(), RepoError> {
        Err(RepoError::database("create_position", "database is locked"))
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Position>, RepoError> {
        self.inner.get(character_id).await
    }

    async fn update(&self, _position: &Position) -> Result<(), RepoError> {
        Err(RepoError::database("update_position", "database is locked"))
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.inner.delete(character_id).await
    }
}

#[tokio::test]
async fn test_stats_failure_leaves_no_records() {
    let failing = Arc::new(Mutex::new(None::<Arc<FailingStats>>));
    let slot = failing.clone();
    let ctx = E2ETestContext::setup_with(
        move |mut repos| {
            let stats = Arc::new(FailingStats {
                inner: repos.stats.clone(),
                attempted: Mutex::new(None),
            });
            *slot.lock().unwrap() = Some(stats.clone());
            repos.stats = stats;
            repos
        },
        |bus| bus,
    )
    .await
    .expect("Setup should succeed");
    let owner = OwnerId::new();

    let outcome = ctx
        .app
        .use_cases
        .create
        .run(thane(owner), &CancellationToken::new())
        .await;

    let SagaOutcome::Failed {
        error,
        compensation,
    } = outcome
    else {
        panic!("Creation should fail at the stats step");
    };
    assert_eq!(error.code(), "unavailable");
    assert!(compensation.is_clean());
    assert_eq!(
        compensation.compensated,
        vec![SagaStep::Appearance, SagaStep::Identity]
    );

    let stats = failing.lock().unwrap().clone().unwrap();
    let id = stats.attempted.lock().unwrap().expect("Stats step should have run");
    assert!(ctx.repos.characters.get(id).await.unwrap().is_none());
    assert!(ctx.repos.appearance.get(id).await.unwrap().is_none());
    assert!(!ctx.repos.characters.name_exists("Thane").await.unwrap());
    assert!(ctx.events_on(SUBJECT_CREATED).await.is_empty());

    let metrics = ctx.app.use_cases.create.metrics().snapshot();
    assert_eq!(metrics.failed, 1);
    assert_eq!(metrics.compensation_failures, 0);
}

#[tokio::test]
async fn test_position_failure_frees_name_and_slot() {
    let ctx = E2ETestContext::setup_with(
        |mut repos| {
            repos.positions = Arc::new(ReadOnlyPositions {
                inner: repos.positions.clone(),
            });
            repos
        },
        |bus| bus,
    )
    .await
    .expect("Setup should succeed");
    let owner = OwnerId::new();
    let uc = &ctx.app.use_cases;

    let err = uc
        .create
        .execute(thane(owner), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "unavailable");

    assert!(ctx.repos.characters.list_by_owner(owner, true).await.unwrap().is_empty());
    assert!(uc.queries.can_create(owner).await.unwrap());
    assert!(!ctx.repos.characters.name_exists("thane").await.unwrap());
}

#[tokio::test]
async fn test_cancelled_creation_writes_nothing() {
    let ctx = E2ETestContext::setup().await.expect("Setup should succeed");
    let owner = OwnerId::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = ctx
        .app
        .use_cases
        .create
        .execute(thane(owner), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "cancelled");
    assert_eq!(ctx.repos.characters.count_active_by_owner(owner).await.unwrap(), 0);
}
