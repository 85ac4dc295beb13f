//! Stat point allocation.

use roster_domain::events::StatsUpdateType;
use roster_domain::{CharacterEvent, CharacterId, Stats};
use roster_shared::AllocateStatPointRequest;

use super::conversions::stat_choice;
use super::{CharacterDeps, CharacterError};
use crate::infrastructure::ports::CacheKey;

pub struct StatsOps {
    deps: CharacterDeps,
}

impl StatsOps {
    pub fn new(deps: CharacterDeps) -> Self {
        Self { deps }
    }

    /// Spend one unspent stat point and recompute derived values.
    pub async fn allocate(
        &self,
        id: CharacterId,
        request: &AllocateStatPointRequest,
    ) -> Result<Stats, CharacterError> {
        let stat = stat_choice(request)?;
        let character = self.deps.load_active(id).await?;
        let mut stats = self
            .deps
            .stores
            .stats
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound { kind: "Stats", id })?;

        let previous = stats.primary;
        stats.allocate_stat_point(stat, self.deps.clock.now())?;
        stats.recalculate(character.class());
        self.deps.stores.stats.update(&stats).await?;

        tracing::debug!(
            character_id = %id,
            stat = stat.as_str(),
            remaining = stats.stat_points_available,
            "Stat point allocated"
        );

        self.deps.invalidate(&[CacheKey::Stats(id)]).await;
        self.deps
            .publish(
                &character,
                CharacterEvent::stats_updated(
                    StatsUpdateType::StatAllocation,
                    previous,
                    stats.primary,
                ),
            )
            .await;
        Ok(stats)
    }
}
