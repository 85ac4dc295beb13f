//! Position snapshots: movement updates, safe points and instances.

use chrono::{DateTime, Utc};
use roster_domain::events::MovementType;
use roster_domain::{CharacterEvent, CharacterId, Position};
use roster_shared::{EnterInstanceRequest, UpdatePositionRequest};

use super::conversions::{instance_binding, position_patch};
use super::{CharacterDeps, CharacterError};
use crate::infrastructure::ports::CacheKey;

pub struct PositionOps {
    deps: CharacterDeps,
}

impl PositionOps {
    pub fn new(deps: CharacterDeps) -> Self {
        Self { deps }
    }

    /// Apply a movement update. The result must stay within world bounds.
    pub async fn update(
        &self,
        id: CharacterId,
        request: UpdatePositionRequest,
    ) -> Result<Position, CharacterError> {
        let patch = position_patch(request);
        self.mutate(id, Some(MovementType::Walk), |position, now| {
            position.apply(patch, now);
            position.validate()?;
            Ok(())
        })
        .await
    }

    /// Return to the safe point, stopping and leaving any instance.
    pub async fn teleport_to_safe(&self, id: CharacterId) -> Result<Position, CharacterError> {
        self.mutate(id, Some(MovementType::Teleport), |position, now| {
            position.teleport_to_safe_position(now);
            Ok(())
        })
        .await
    }

    /// Make the current location the safe point. No event is published.
    pub async fn save_safe(&self, id: CharacterId) -> Result<Position, CharacterError> {
        self.mutate(id, None, |position, now| {
            position.save_safe_position(now);
            Ok(())
        })
        .await
    }

    pub async fn enter_instance(
        &self,
        id: CharacterId,
        request: EnterInstanceRequest,
    ) -> Result<Position, CharacterError> {
        let binding = instance_binding(request)?;
        self.mutate(id, Some(MovementType::InstanceEnter), |position, now| {
            position.enter_instance(binding, now);
            Ok(())
        })
        .await
    }

    pub async fn leave_instance(&self, id: CharacterId) -> Result<Position, CharacterError> {
        self.mutate(id, Some(MovementType::InstanceLeave), |position, now| {
            if !position.is_in_instance() {
                return Err(CharacterError::Validation(
                    "Character is not in an instance".to_string(),
                ));
            }
            position.leave_instance(now);
            Ok(())
        })
        .await
    }

    /// Read-modify-write of the position record, then invalidate and announce.
    async fn mutate<F>(
        &self,
        id: CharacterId,
        movement: Option<MovementType>,
        change: F,
    ) -> Result<Position, CharacterError>
    where
        F: FnOnce(&mut Position, DateTime<Utc>) -> Result<(), CharacterError>,
    {
        let character = self.deps.load_active(id).await?;
        let mut position = self
            .deps
            .stores
            .positions
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound {
                kind: "Position",
                id,
            })?;
        let previous = position.clone();

        change(&mut position, self.deps.clock.now())?;
        self.deps.stores.positions.update(&position).await?;

        tracing::debug!(
            character_id = %id,
            zone_id = %position.zone_id,
            movement = ?movement,
            "Position updated"
        );

        self.deps.invalidate(&[CacheKey::Position(id)]).await;
        if let Some(movement_type) = movement {
            self.deps
                .publish(
                    &character,
                    CharacterEvent::PositionUpdated {
                        previous_position: Some(previous),
                        new_position: position.clone(),
                        movement_type,
                    },
                )
                .await;
        }
        Ok(position)
    }
}
