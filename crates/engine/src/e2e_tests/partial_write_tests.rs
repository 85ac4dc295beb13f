//! E2E tests for mutations that touch more than one record.
//!
//! Tests verify:
//! - A failed second write leaves no stale cached view behind
//! - Level-up points survive a failed write and a retry

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use roster_domain::{CharacterId, OwnerId, Stats};
use tokio_util::sync::CancellationToken;

use super::{thane, E2ETestContext};
use crate::infrastructure::ports::{RepoError, StatsRepo};

/// Stats store whose updates fail while `failing` is set.
struct FlakyStats {
    inner: Arc<dyn StatsRepo>,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl StatsRepo for FlakyStats {
    async fn create(&self, stats: &Stats) -> Result<(), RepoError> {
        self.inner.create(stats).await
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Stats>, RepoError> {
        self.inner.get(character_id).await
    }

    async fn update(&self, stats: &Stats) -> Result<(), RepoError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::database("update_stats", "database is locked"));
        }
        self.inner.update(stats).await
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.inner.delete(character_id).await
    }
}

#[tokio::test]
async fn test_failed_level_up_can_be_retried() {
    let failing = Arc::new(AtomicBool::new(false));
    let flag = failing.clone();
    let ctx = E2ETestContext::setup_with(
        move |mut repos| {
            repos.stats = Arc::new(FlakyStats {
                inner: repos.stats.clone(),
                failing: flag,
            });
            repos
        },
        |bus| bus,
    )
    .await
    .expect("Setup should succeed");
    let uc = &ctx.app.use_cases;
    let id = uc
        .create
        .execute(thane(OwnerId::new()), &CancellationToken::new())
        .await
        .unwrap()
        .id();

    // Warm the identity and stats views
    assert_eq!(uc.queries.get_character(id).await.unwrap().level(), 1);
    uc.queries.get_stats(id).await.unwrap();

    failing.store(true, Ordering::SeqCst);
    let err = uc.lifecycle.grant_experience(id, 100).await.unwrap_err();
    assert_eq!(err.code(), "unavailable");

    // Store and cache agree on the old level
    let stored = ctx.repos.characters.get(id).await.unwrap().unwrap();
    assert_eq!(stored.level(), 1);
    assert_eq!(uc.queries.get_character(id).await.unwrap().level(), 1);

    failing.store(false, Ordering::SeqCst);
    let progress = uc.lifecycle.grant_experience(id, 100).await.unwrap();
    assert_eq!(progress.levels_gained(), 1);
    assert_eq!(uc.queries.get_character(id).await.unwrap().level(), 2);
    assert_eq!(uc.queries.get_stats(id).await.unwrap().stat_points_available, 5);
}
