//! Character use cases.
//!
//! Every operation follows the same shape: read through the cache on queries;
//! on mutations write the store, invalidate the affected cache views, then
//! publish an event on a best-effort basis.

use std::sync::Arc;
use std::time::Duration;

use roster_domain::value_objects::NamePolicy;
use roster_domain::{Character, CharacterEvent, CharacterId, DomainError, OwnerId};
use roster_shared::ErrorResponse;

use crate::infrastructure::background::BackgroundPublisher;
use crate::infrastructure::ports::{
    AppearanceRepo, CacheKey, CharacterCache, CharacterRepo, ClockPort, EventPublisherPort,
    PositionRepo, RepoError, StatsRepo, NAME_TAKEN, SLOT_OCCUPIED,
};

mod appearance;
mod cache_aside;
mod conversions;
mod create;
mod lifecycle;
mod position;
mod queries;
mod saga;
mod stats;

#[cfg(test)]
mod test_support;

pub use appearance::AppearanceOps;
pub use conversions::NewCharacter;
pub use create::CreateCharacter;
pub use lifecycle::CharacterLifecycle;
pub use position::PositionOps;
pub use queries::CharacterQueries;
pub use saga::{
    CompensationFailure, CompensationReport, SagaMetrics, SagaMetricsSnapshot, SagaOutcome,
    SagaStep,
};
pub use stats::StatsOps;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum CharacterError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Character not found: {0}")]
    NotFound(CharacterId),

    #[error("No character named {0}")]
    NameNotFound(String),

    /// The identity exists but one of its sub-records does not.
    #[error("{kind} not found for character {id}")]
    RecordNotFound { kind: &'static str, id: CharacterId },

    #[error("Character {0} is deleted")]
    Deleted(CharacterId),

    #[error("Character name is already taken")]
    NameTaken,

    #[error("Character slot is already occupied")]
    SlotOccupied,

    #[error("Character limit of {max} reached")]
    LimitReached { max: u32 },

    #[error("Character belongs to another owner")]
    NotOwner,

    #[error("No stat points available")]
    NoStatPointsAvailable,

    #[error("Character cannot be restored")]
    CannotBeRestored,

    #[error("No character selected")]
    NoCharacterSelected,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] RepoError),
}

impl From<DomainError> for CharacterError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::NoStatPointsAvailable => CharacterError::NoStatPointsAvailable,
            DomainError::CannotBeRestored => CharacterError::CannotBeRestored,
            DomainError::Validation(msg)
            | DomainError::Parse(msg)
            | DomainError::InvalidStateTransition(msg) => CharacterError::Validation(msg),
        }
    }
}

impl CharacterError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            CharacterError::Validation(_) => "validation",
            CharacterError::NotFound(_)
            | CharacterError::NameNotFound(_)
            | CharacterError::RecordNotFound { .. } => "not_found",
            CharacterError::Deleted(_) => "deleted",
            CharacterError::NameTaken => "name_taken",
            CharacterError::SlotOccupied => "slot_occupied",
            CharacterError::LimitReached { .. } => "limit_reached",
            CharacterError::NotOwner => "not_owner",
            CharacterError::NoStatPointsAvailable => "no_stat_points_available",
            CharacterError::CannotBeRestored => "cannot_be_restored",
            CharacterError::NoCharacterSelected => "no_character_selected",
            CharacterError::Cancelled => "cancelled",
            CharacterError::Unavailable(_) => "unavailable",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }

    /// Map a store write failure, turning uniqueness rules into conflicts.
    pub(crate) fn from_write(error: RepoError) -> Self {
        match error {
            RepoError::ConstraintViolation(ref msg) if msg == NAME_TAKEN => CharacterError::NameTaken,
            RepoError::ConstraintViolation(ref msg) if msg == SLOT_OCCUPIED => {
                CharacterError::SlotOccupied
            }
            other => CharacterError::Unavailable(other),
        }
    }
}

// =============================================================================
// Dependencies
// =============================================================================

/// Business limits applied by the use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterPolicy {
    pub max_per_owner: u32,
    pub name_policy: NamePolicy,
    /// How old a stored selection may be and still count when the cache is cold.
    pub selection_window: Duration,
}

impl Default for CharacterPolicy {
    fn default() -> Self {
        Self {
            max_per_owner: 5,
            name_policy: NamePolicy::default(),
            selection_window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// The four record stores of a character.
#[derive(Clone)]
pub struct CharacterStores {
    pub characters: Arc<dyn CharacterRepo>,
    pub appearance: Arc<dyn AppearanceRepo>,
    pub stats: Arc<dyn StatsRepo>,
    pub positions: Arc<dyn PositionRepo>,
}

/// Everything a character use case touches.
#[derive(Clone)]
pub struct CharacterDeps {
    pub stores: CharacterStores,
    pub cache: Arc<dyn CharacterCache>,
    pub publisher: Arc<dyn EventPublisherPort>,
    pub background: BackgroundPublisher,
    pub clock: Arc<dyn ClockPort>,
    pub policy: CharacterPolicy,
}

impl CharacterDeps {
    /// Identity record regardless of deletion state.
    pub(crate) async fn load(&self, id: CharacterId) -> Result<Character, CharacterError> {
        self.stores
            .characters
            .get(id)
            .await?
            .ok_or(CharacterError::NotFound(id))
    }

    /// Identity record that has not been soft-deleted.
    pub(crate) async fn load_active(&self, id: CharacterId) -> Result<Character, CharacterError> {
        let character = self.load(id).await?;
        if character.is_deleted() {
            return Err(CharacterError::Deleted(id));
        }
        Ok(character)
    }

    /// Identity record owned by `owner_id`.
    pub(crate) async fn load_owned(
        &self,
        id: CharacterId,
        owner_id: OwnerId,
    ) -> Result<Character, CharacterError> {
        let character = self.load(id).await?;
        if !character.is_owned_by(owner_id) {
            return Err(CharacterError::NotOwner);
        }
        Ok(character)
    }

    pub(crate) async fn invalidate(&self, keys: &[CacheKey]) {
        cache_aside::invalidate(self.cache.as_ref(), keys).await;
    }

    /// Publish and wait; a failure is logged and never reaches the caller.
    pub(crate) async fn publish(&self, character: &Character, event: CharacterEvent) {
        let subject = event.subject();
        if let Err(e) = self
            .publisher
            .publish(character.id(), character.owner_id(), event)
            .await
        {
            tracing::warn!(
                character_id = %character.id(),
                subject,
                error = %e,
                "Failed to publish character event"
            );
        }
    }
}

// =============================================================================
// Container
// =============================================================================

/// Container for character use cases.
pub struct CharacterUseCases {
    pub create: Arc<CreateCharacter>,
    pub queries: Arc<CharacterQueries>,
    pub lifecycle: Arc<CharacterLifecycle>,
    pub appearance: Arc<AppearanceOps>,
    pub stats: Arc<StatsOps>,
    pub position: Arc<PositionOps>,
}

impl CharacterUseCases {
    pub fn new(deps: CharacterDeps) -> Self {
        let queries = Arc::new(CharacterQueries::new(deps.clone()));
        Self {
            create: Arc::new(CreateCharacter::new(deps.clone())),
            lifecycle: Arc::new(CharacterLifecycle::new(deps.clone())),
            appearance: Arc::new(AppearanceOps::new(deps.clone())),
            stats: Arc::new(StatsOps::new(deps.clone())),
            position: Arc::new(PositionOps::new(deps)),
            queries,
        }
    }
}
