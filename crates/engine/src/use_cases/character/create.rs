//! Create character use case.
//!
//! Preconditions are checked without writing anything. The four records are
//! then written as a saga; see [`super::saga`] for compensation rules.

use roster_domain::value_objects::{CharacterName, SlotNumber};
use roster_domain::{Appearance, Character, CharacterEvent, Position, Stats};
use tokio_util::sync::CancellationToken;

use super::saga::{compensate, SagaMetrics, SagaOutcome, SagaStep};
use super::{CharacterDeps, CharacterError, NewCharacter};
use crate::infrastructure::ports::{CacheKey, RepoError};

/// Records built up front so that every validation happens before the first write.
struct CreationPlan {
    character: Character,
    appearance: Appearance,
    stats: Stats,
    position: Position,
}

pub struct CreateCharacter {
    deps: CharacterDeps,
    metrics: SagaMetrics,
}

impl CreateCharacter {
    pub fn new(deps: CharacterDeps) -> Self {
        Self {
            deps,
            metrics: SagaMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &SagaMetrics {
        &self.metrics
    }

    /// Create a character, returning it or the error that stopped the saga.
    pub async fn execute(
        &self,
        input: NewCharacter,
        cancel: &CancellationToken,
    ) -> Result<Character, CharacterError> {
        self.run(input, cancel).await.into_result()
    }

    /// Create a character and report what compensation did on failure.
    pub async fn run(&self, input: NewCharacter, cancel: &CancellationToken) -> SagaOutcome {
        self.metrics.record_started();

        let outcome = match self.prepare(input).await {
            Ok(plan) => self.apply(plan, cancel).await,
            Err(error) => SagaOutcome::rejected(error),
        };

        match &outcome {
            SagaOutcome::Completed(_) => self.metrics.record_completed(),
            SagaOutcome::Failed { compensation, .. } => self.metrics.record_failed(compensation),
        }
        outcome
    }

    async fn prepare(&self, input: NewCharacter) -> Result<CreationPlan, CharacterError> {
        let characters = &self.deps.stores.characters;
        let policy = &self.deps.policy;

        let active = characters.count_active_by_owner(input.owner_id).await?;
        if active >= policy.max_per_owner {
            return Err(CharacterError::LimitReached {
                max: policy.max_per_owner,
            });
        }

        let name = CharacterName::parse(&input.name, &policy.name_policy)?;
        if characters.name_exists(name.as_str()).await? {
            return Err(CharacterError::NameTaken);
        }

        let slot = SlotNumber::new(input.slot)?;
        if characters
            .get_active_in_slot(input.owner_id, slot)
            .await?
            .is_some()
        {
            return Err(CharacterError::SlotOccupied);
        }

        let now = self.deps.clock.now();
        let character = Character::new(
            input.owner_id,
            name,
            slot,
            input.class,
            input.race,
            input.gender,
            now,
        );
        let id = character.id();

        let mut appearance = Appearance::for_character(id, input.race, input.gender, now);
        appearance.apply(input.appearance);
        appearance.validate()?;

        Ok(CreationPlan {
            stats: Stats::for_class(id, input.class, now),
            position: Position::spawn_for_class(id, input.class, now),
            appearance,
            character,
        })
    }

    async fn apply(&self, plan: CreationPlan, cancel: &CancellationToken) -> SagaOutcome {
        let id = plan.character.id();
        let owner_id = plan.character.owner_id();
        let mut written = Vec::with_capacity(SagaStep::ORDER.len());

        for step in SagaStep::ORDER {
            if cancel.is_cancelled() {
                return self.abort(&plan, written, step, CharacterError::Cancelled).await;
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.write(step, &plan) => Some(result),
            };

            match result {
                Some(Ok(())) => {
                    tracing::debug!(character_id = %id, %step, "Creation step written");
                    written.push(step);
                }
                Some(Err(e)) => {
                    return self
                        .abort(&plan, written, step, CharacterError::from_write(e))
                        .await;
                }
                None => {
                    // The dropped write may still have landed.
                    written.push(step);
                    return self.abort(&plan, written, step, CharacterError::Cancelled).await;
                }
            }
        }

        let character = plan.character;
        tracing::info!(
            character_id = %id,
            %owner_id,
            name = %character.name(),
            class = character.class().as_str(),
            "Character created"
        );

        self.deps
            .invalidate(&[CacheKey::CharacterList(owner_id), CacheKey::CharacterCount(owner_id)])
            .await;
        self.deps
            .publish(
                &character,
                CharacterEvent::Created {
                    name: character.name().to_string(),
                    class_type: character.class(),
                    race: character.race(),
                    gender: character.gender(),
                    level: character.level(),
                    slot_number: character.slot().get(),
                },
            )
            .await;

        SagaOutcome::Completed(character)
    }

    async fn write(&self, step: SagaStep, plan: &CreationPlan) -> Result<(), RepoError> {
        let stores = &self.deps.stores;
        match step {
            SagaStep::Identity => stores.characters.create(&plan.character).await,
            SagaStep::Appearance => stores.appearance.create(&plan.appearance).await,
            SagaStep::Stats => stores.stats.create(&plan.stats).await,
            SagaStep::Position => stores.positions.create(&plan.position).await,
        }
    }

    async fn abort(
        &self,
        plan: &CreationPlan,
        written: Vec<SagaStep>,
        failed_step: SagaStep,
        error: CharacterError,
    ) -> SagaOutcome {
        let id = plan.character.id();
        let owner_id = plan.character.owner_id();
        tracing::warn!(
            character_id = %id,
            %owner_id,
            step = %failed_step,
            error = %error,
            "Character creation failed, compensating"
        );

        let compensation = compensate(&self.deps.stores, id, owner_id, &written).await;
        if !compensation.is_clean() {
            tracing::error!(
                character_id = %id,
                %owner_id,
                orphaned = ?compensation.orphaned_steps(),
                "Character creation left orphaned records"
            );
        }

        SagaOutcome::Failed {
            error,
            compensation,
        }
    }
}
