//! Soft-delete, restore, selection, activity and progression.

use roster_domain::aggregates::{SKILL_POINTS_PER_LEVEL, STAT_POINTS_PER_LEVEL};
use roster_domain::events::StatsUpdateType;
use roster_domain::{Character, CharacterEvent, CharacterId, LevelProgress, OwnerId};

use super::{CharacterDeps, CharacterError};
use crate::infrastructure::ports::CacheKey;

pub struct CharacterLifecycle {
    deps: CharacterDeps,
}

impl CharacterLifecycle {
    pub fn new(deps: CharacterDeps) -> Self {
        Self { deps }
    }

    /// Soft-delete. The character stays restorable for 30 days.
    pub async fn delete(&self, id: CharacterId, owner_id: OwnerId) -> Result<(), CharacterError> {
        let mut character = self.deps.load_owned(id, owner_id).await?;
        if character.is_deleted() {
            return Err(CharacterError::Deleted(id));
        }

        character.soft_delete(self.deps.clock.now())?;
        self.deps.stores.characters.update(&character).await?;

        tracing::info!(
            character_id = %id,
            %owner_id,
            restore_deadline = ?character.restore_deadline(),
            "Character soft-deleted"
        );

        self.deps.invalidate(&bulk_keys(id, owner_id)).await;
        self.deps
            .publish(
                &character,
                CharacterEvent::Deleted {
                    name: character.name().to_string(),
                    soft_delete: true,
                    delete_reason: None,
                },
            )
            .await;
        Ok(())
    }

    /// Undo a soft-delete while the restore window is open and both the slot
    /// and the name are still free.
    pub async fn restore(
        &self,
        id: CharacterId,
        owner_id: OwnerId,
    ) -> Result<Character, CharacterError> {
        let mut character = self.deps.load_owned(id, owner_id).await?;
        let now = self.deps.clock.now();
        if !character.can_be_restored(now) {
            return Err(CharacterError::CannotBeRestored);
        }

        let characters = &self.deps.stores.characters;
        if characters
            .get_active_in_slot(owner_id, character.slot())
            .await?
            .is_some()
        {
            return Err(CharacterError::SlotOccupied);
        }
        if characters.name_exists(character.name().as_str()).await? {
            return Err(CharacterError::NameTaken);
        }
        let max = self.deps.policy.max_per_owner;
        if characters.count_active_by_owner(owner_id).await? >= max {
            return Err(CharacterError::LimitReached { max });
        }

        character.restore(now)?;
        characters
            .update(&character)
            .await
            .map_err(CharacterError::from_write)?;

        tracing::info!(character_id = %id, %owner_id, "Character restored");

        self.deps.invalidate(&bulk_keys(id, owner_id)).await;
        self.deps
            .publish(
                &character,
                CharacterEvent::Restored {
                    name: character.name().to_string(),
                    restore_reason: None,
                },
            )
            .await;
        Ok(character)
    }

    /// Make `id` the owner's current character, clearing any previous selection.
    pub async fn select(
        &self,
        id: CharacterId,
        owner_id: OwnerId,
        session_id: Option<String>,
    ) -> Result<Character, CharacterError> {
        let mut character = self.deps.load_owned(id, owner_id).await?;
        if character.is_deleted() {
            return Err(CharacterError::Deleted(id));
        }

        let mut keys = vec![
            CacheKey::Character(id),
            CacheKey::CharacterList(owner_id),
            CacheKey::SelectedCharacter(owner_id),
        ];
        match self.deps.stores.characters.list_by_owner(owner_id, false).await {
            Ok(listed) => keys.extend(
                self.clear_selection(listed, Some(id))
                    .await
                    .into_iter()
                    .map(CacheKey::Character),
            ),
            Err(e) => {
                tracing::warn!(%owner_id, error = %e, "Failed to list characters for deselection");
            }
        }

        character.select(self.deps.clock.now())?;
        if let Err(e) = self.deps.stores.characters.update(&character).await {
            // Other characters may already be deselected.
            self.deps.invalidate(&keys).await;
            return Err(e.into());
        }

        tracing::info!(character_id = %id, %owner_id, "Character selected");

        self.deps.invalidate(&keys).await;
        self.deps
            .publish(
                &character,
                CharacterEvent::Selected {
                    name: character.name().to_string(),
                    session_id: session_id.clone(),
                },
            )
            .await;

        match self.deps.stores.positions.get(id).await {
            Ok(Some(position)) => {
                self.deps
                    .publish(
                        &character,
                        CharacterEvent::Online {
                            name: character.name().to_string(),
                            session_id,
                            world_id: position.world_id,
                            zone_id: position.zone_id,
                        },
                    )
                    .await;
            }
            Ok(None) => {
                tracing::warn!(character_id = %id, "Selected character has no position record");
            }
            Err(e) => {
                tracing::warn!(character_id = %id, error = %e, "Failed to read position for online event");
            }
        }

        Ok(character)
    }

    /// Clear the owner's selection. Having nothing selected is not an error.
    pub async fn deselect(&self, owner_id: OwnerId) -> Result<(), CharacterError> {
        let listed = self
            .deps
            .stores
            .characters
            .list_by_owner(owner_id, false)
            .await?;
        if !listed.iter().any(Character::is_selected) {
            self.deps
                .invalidate(&[CacheKey::SelectedCharacter(owner_id)])
                .await;
            return Ok(());
        }

        let cleared = self.clear_selection(listed, None).await;
        tracing::info!(%owner_id, cleared = cleared.len(), "Character selection cleared");

        let mut keys = vec![
            CacheKey::SelectedCharacter(owner_id),
            CacheKey::CharacterList(owner_id),
        ];
        keys.extend(cleared.into_iter().map(CacheKey::Character));
        self.deps.invalidate(&keys).await;
        Ok(())
    }

    /// Deselect every selected character in `listed` except `keep`.
    /// Failures are logged and skipped; returns the ids that were cleared.
    async fn clear_selection(
        &self,
        listed: Vec<Character>,
        keep: Option<CharacterId>,
    ) -> Vec<CharacterId> {
        let characters = &self.deps.stores.characters;
        let now = self.deps.clock.now();
        let mut cleared = Vec::new();
        for mut other in listed {
            if Some(other.id()) == keep || !other.deselect(now) {
                continue;
            }
            match characters.update(&other).await {
                Ok(()) => cleared.push(other.id()),
                Err(e) => tracing::warn!(
                    character_id = %other.id(),
                    owner_id = %other.owner_id(),
                    error = %e,
                    "Failed to deselect character"
                ),
            }
        }
        cleared
    }

    /// Add a finished session's play time and announce the character online.
    ///
    /// The event goes out on the background publisher; this call never waits
    /// for delivery.
    pub async fn record_activity(
        &self,
        id: CharacterId,
        session_id: Option<String>,
        played_for: chrono::Duration,
    ) -> Result<(), CharacterError> {
        let mut character = self.deps.load_active(id).await?;
        character.record_play(played_for, self.deps.clock.now());
        self.deps.stores.characters.update(&character).await?;

        self.deps
            .invalidate(&CacheKey::identity(id, character.owner_id()))
            .await;

        let position = match self.deps.stores.positions.get(id).await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!(character_id = %id, error = %e, "Failed to read position for activity");
                None
            }
        };
        if let Some(position) = position {
            self.deps.background.spawn(
                id,
                character.owner_id(),
                CharacterEvent::Online {
                    name: character.name().to_string(),
                    session_id,
                    world_id: position.world_id,
                    zone_id: position.zone_id,
                },
            );
        }
        Ok(())
    }

    /// Add experience. Each level gained grants stat and skill points.
    pub async fn grant_experience(
        &self,
        id: CharacterId,
        amount: u64,
    ) -> Result<LevelProgress, CharacterError> {
        let mut character = self.deps.load_active(id).await?;
        let now = self.deps.clock.now();
        let progress = character.grant_experience(amount, now);
        let gained = progress.levels_gained();

        let mut stats = None;
        if gained > 0 {
            let mut current = self
                .deps
                .stores
                .stats
                .get(id)
                .await?
                .ok_or(CharacterError::RecordNotFound { kind: "Stats", id })?;
            let previous = current.primary;
            current.add_stat_points(gained * STAT_POINTS_PER_LEVEL, now);
            current.add_skill_points(gained * SKILL_POINTS_PER_LEVEL, now);
            current.recalculate(character.class());
            stats = Some((previous, current));
        }

        // Stats before identity: the level-up stays pending until the identity write lands.
        let mut keys = Vec::new();
        if let Some((_, stats)) = &stats {
            self.deps.stores.stats.update(stats).await?;
            keys.push(CacheKey::Stats(id));
        }
        if let Err(e) = self.deps.stores.characters.update(&character).await {
            self.deps.invalidate(&keys).await;
            return Err(e.into());
        }
        keys.extend(CacheKey::identity(id, character.owner_id()));
        self.deps.invalidate(&keys).await;

        let Some((previous, stats)) = stats else {
            return Ok(progress);
        };

        tracing::info!(
            character_id = %id,
            previous_level = progress.previous_level,
            new_level = progress.new_level,
            "Character levelled up"
        );

        self.deps
            .publish(
                &character,
                CharacterEvent::LevelUp {
                    name: character.name().to_string(),
                    previous_level: progress.previous_level,
                    new_level: progress.new_level,
                    experience: progress.experience,
                    stat_points_gained: gained * STAT_POINTS_PER_LEVEL,
                    skill_points_gained: gained * SKILL_POINTS_PER_LEVEL,
                },
            )
            .await;
        self.deps
            .publish(
                &character,
                CharacterEvent::stats_updated(StatsUpdateType::LevelUp, previous, stats.primary),
            )
            .await;
        Ok(progress)
    }
}

/// Every per-character and per-owner view.
fn bulk_keys(id: CharacterId, owner_id: OwnerId) -> Vec<CacheKey> {
    let mut keys = CacheKey::all_for_character(id).to_vec();
    keys.extend(CacheKey::all_for_owner(owner_id));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::RepoError;
    use crate::use_cases::character::test_support::{fixed_now, thane, Mocks};
    use mockall::Sequence;
    use roster_domain::value_objects::ClassType;
    use roster_domain::{EventId, Position, Stats};

    fn stored(mocks: &mut Mocks, character: Character) {
        mocks
            .characters
            .expect_get()
            .returning(move |_| Ok(Some(character.clone())));
    }

    #[tokio::test]
    async fn delete_bulk_invalidates_and_announces() {
        let owner = OwnerId::new();
        let character = thane(owner);
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_update()
            .withf(|c| c.is_deleted())
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| matches!(event, CharacterEvent::Deleted { soft_delete: true, .. }))
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        lifecycle.delete(id, owner).await.unwrap();

        assert_eq!(*invalidated.lock().unwrap(), bulk_keys(id, owner));
    }

    #[tokio::test]
    async fn delete_by_another_owner_is_refused() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);
        mocks.characters.expect_update().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.delete(id, OwnerId::new()).await.unwrap_err();
        assert!(matches!(err, CharacterError::NotOwner));
    }

    #[tokio::test]
    async fn restore_after_window_is_refused() {
        let owner = OwnerId::new();
        let mut character = thane(owner);
        character
            .soft_delete(fixed_now() - chrono::Duration::days(31))
            .unwrap();
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);
        mocks.characters.expect_update().never();
        mocks.publisher.expect_publish().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.restore(id, owner).await.unwrap_err();
        assert_eq!(err.code(), "cannot_be_restored");
    }

    #[tokio::test]
    async fn restore_into_a_taken_slot_is_refused() {
        let owner = OwnerId::new();
        let mut character = thane(owner);
        character
            .soft_delete(fixed_now() - chrono::Duration::days(1))
            .unwrap();
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_get_active_in_slot()
            .returning(|owner, _| Ok(Some(thane(owner))));
        mocks.characters.expect_update().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.restore(id, owner).await.unwrap_err();
        assert!(matches!(err, CharacterError::SlotOccupied));
    }

    #[tokio::test]
    async fn restore_within_window_succeeds() {
        let owner = OwnerId::new();
        let mut character = thane(owner);
        character
            .soft_delete(fixed_now() - chrono::Duration::days(29))
            .unwrap();
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_get_active_in_slot()
            .returning(|_, _| Ok(None));
        mocks.characters.expect_name_exists().returning(|_| Ok(false));
        mocks
            .characters
            .expect_count_active_by_owner()
            .returning(|_| Ok(4));
        mocks
            .characters
            .expect_update()
            .withf(|c| !c.is_deleted())
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| matches!(event, CharacterEvent::Restored { .. }))
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let restored = lifecycle.restore(id, owner).await.unwrap();
        assert!(!restored.is_deleted());
    }

    #[tokio::test]
    async fn restore_after_name_was_reclaimed_is_refused() {
        let owner = OwnerId::new();
        let mut character = thane(owner);
        character
            .soft_delete(fixed_now() - chrono::Duration::days(2))
            .unwrap();
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_get_active_in_slot()
            .returning(|_, _| Ok(None));
        mocks
            .characters
            .expect_name_exists()
            .withf(|name| name == "Thane")
            .returning(|_| Ok(true));
        mocks.characters.expect_update().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.restore(id, owner).await.unwrap_err();
        assert!(matches!(err, CharacterError::NameTaken));
    }

    #[tokio::test]
    async fn select_clears_the_previous_selection() {
        let owner = OwnerId::new();
        let target = thane(owner);
        let id = target.id();
        let mut previous = thane(owner);
        previous.select(fixed_now()).unwrap();
        let previous_id = previous.id();

        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, target.clone());
        mocks
            .characters
            .expect_list_by_owner()
            .returning(move |_, _| Ok(vec![target.clone(), previous.clone()]));
        mocks
            .characters
            .expect_update()
            .withf(move |c| c.id() == previous_id && !c.is_selected())
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .characters
            .expect_update()
            .withf(move |c| c.id() == id && c.is_selected())
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .positions
            .expect_get()
            .returning(|id| Ok(Some(Position::spawn_for_class(id, ClassType::Warrior, fixed_now()))));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| matches!(event, CharacterEvent::Selected { .. }))
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| {
                matches!(event, CharacterEvent::Online { zone_id, .. } if zone_id == "warrior_training_grounds")
            })
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let selected = lifecycle.select(id, owner, None).await.unwrap();

        assert!(selected.is_selected());
        let keys = invalidated.lock().unwrap();
        assert!(keys.contains(&CacheKey::SelectedCharacter(owner)));
        assert!(keys.contains(&CacheKey::Character(previous_id)));
    }

    #[tokio::test]
    async fn failed_select_still_invalidates_deselected_characters() {
        let owner = OwnerId::new();
        let target = thane(owner);
        let id = target.id();
        let mut previous = thane(owner);
        previous.select(fixed_now()).unwrap();
        let previous_id = previous.id();

        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, target.clone());
        mocks
            .characters
            .expect_list_by_owner()
            .returning(move |_, _| Ok(vec![target.clone(), previous.clone()]));
        mocks
            .characters
            .expect_update()
            .withf(move |c| c.id() == previous_id)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .characters
            .expect_update()
            .withf(move |c| c.id() == id)
            .times(1)
            .returning(|_| Err(RepoError::database("update_character", "database is locked")));
        mocks.publisher.expect_publish().never();
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.select(id, owner, None).await.unwrap_err();

        assert_eq!(err.code(), "unavailable");
        let keys = invalidated.lock().unwrap();
        assert!(keys.contains(&CacheKey::Character(previous_id)));
        assert!(keys.contains(&CacheKey::SelectedCharacter(owner)));
    }

    #[tokio::test]
    async fn selecting_a_deleted_character_fails() {
        let owner = OwnerId::new();
        let mut character = thane(owner);
        character.soft_delete(fixed_now()).unwrap();
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.select(id, owner, None).await.unwrap_err();
        assert_eq!(err.code(), "deleted");
    }

    #[tokio::test]
    async fn deselect_with_nothing_selected_only_invalidates() {
        let owner = OwnerId::new();
        let mut mocks = Mocks::new().with_cold_cache();
        mocks
            .characters
            .expect_list_by_owner()
            .returning(|owner, _| Ok(vec![thane(owner)]));
        mocks.characters.expect_update().never();
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        lifecycle.deselect(owner).await.unwrap();
        assert_eq!(
            *invalidated.lock().unwrap(),
            vec![CacheKey::SelectedCharacter(owner)]
        );
    }

    #[tokio::test]
    async fn experience_without_level_up_touches_identity_only() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_update()
            .withf(|c| c.experience() == 50 && c.level() == 1)
            .times(1)
            .returning(|_| Ok(()));
        mocks.stats.expect_get().never();
        mocks.publisher.expect_publish().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let progress = lifecycle.grant_experience(id, 50).await.unwrap();
        assert_eq!(progress.levels_gained(), 0);
    }

    #[tokio::test]
    async fn level_up_grants_points_and_announces() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks.characters.expect_update().returning(|_| Ok(()));
        mocks
            .stats
            .expect_get()
            .returning(|id| Ok(Some(Stats::for_class(id, ClassType::Warrior, fixed_now()))));
        // 400 xp reaches level 3
        mocks
            .stats
            .expect_update()
            .withf(|s| s.stat_points_available == 10 && s.skill_points_available == 2)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| {
                matches!(event, CharacterEvent::LevelUp { new_level: 3, stat_points_gained: 10, .. })
            })
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| matches!(event, CharacterEvent::StatsUpdated { .. }))
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let progress = lifecycle.grant_experience(id, 400).await.unwrap();

        assert_eq!(progress.new_level, 3);
        assert!(invalidated.lock().unwrap().contains(&CacheKey::Stats(id)));
    }

    #[tokio::test]
    async fn level_up_writes_stats_before_identity() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks
            .stats
            .expect_get()
            .returning(|id| Ok(Some(Stats::for_class(id, ClassType::Warrior, fixed_now()))));

        let mut seq = Sequence::new();
        mocks
            .stats
            .expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .characters
            .expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepoError::database("update_character", "disk I/O error")));
        mocks.publisher.expect_publish().never();
        let invalidated = mocks.invalidated.clone();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.grant_experience(id, 100).await.unwrap_err();

        assert_eq!(err.code(), "unavailable");
        assert_eq!(*invalidated.lock().unwrap(), vec![CacheKey::Stats(id)]);
    }

    #[tokio::test]
    async fn failed_stats_write_leaves_identity_untouched() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new();
        stored(&mut mocks, character);
        mocks
            .stats
            .expect_get()
            .returning(|id| Ok(Some(Stats::for_class(id, ClassType::Warrior, fixed_now()))));
        mocks
            .stats
            .expect_update()
            .returning(|_| Err(RepoError::database("update_stats", "disk I/O error")));
        mocks.characters.expect_update().never();
        mocks.cache.expect_invalidate().never();

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle.grant_experience(id, 100).await.unwrap_err();
        assert_eq!(err.code(), "unavailable");
    }

    #[tokio::test]
    async fn activity_is_announced_in_the_background() {
        let character = thane(OwnerId::new());
        let id = character.id();
        let mut mocks = Mocks::new().with_cold_cache();
        stored(&mut mocks, character);
        mocks
            .characters
            .expect_update()
            .withf(|c| c.total_play_time().num_minutes() == 45)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .positions
            .expect_get()
            .returning(|id| Ok(Some(Position::spawn_for_class(id, ClassType::Warrior, fixed_now()))));
        mocks
            .publisher
            .expect_publish()
            .withf(|_, _, event| matches!(event, CharacterEvent::Online { .. }))
            .times(1)
            .returning(|_, _, _| Ok(EventId::new()));

        let deps = mocks.into_deps();
        let background = deps.background.clone();
        let lifecycle = CharacterLifecycle::new(deps);
        lifecycle
            .record_activity(id, Some("session-1".to_string()), chrono::Duration::minutes(45))
            .await
            .unwrap();

        background.drain().await;
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_unavailable() {
        let mut mocks = Mocks::new();
        mocks
            .characters
            .expect_get()
            .returning(|_| Err(RepoError::database("get_character", "locked")));

        let lifecycle = CharacterLifecycle::new(mocks.into_deps());
        let err = lifecycle
            .grant_experience(CharacterId::new(), 10)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unavailable");
    }
}
