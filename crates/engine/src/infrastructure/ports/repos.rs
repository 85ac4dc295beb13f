//! Repository port traits for the four character record stores.
//!
//! Each record kind lives in its own store, so a character is only whole once
//! all four writes succeed. Cross-store consistency is the creation saga's job.

use async_trait::async_trait;
use roster_domain::value_objects::SlotNumber;
use roster_domain::{Appearance, Character, CharacterId, OwnerId, Position, Stats};

use super::error::RepoError;

// =============================================================================
// Identity
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Insert a new identity record. Name and active-slot collisions return
    /// `RepoError::ConstraintViolation`.
    async fn create(&self, character: &Character) -> Result<(), RepoError>;

    /// Fetch by id, including soft-deleted records.
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;

    /// Case-insensitive name lookup, including soft-deleted records.
    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError>;

    /// Characters of an owner ordered by slot.
    async fn list_by_owner(
        &self,
        owner_id: OwnerId,
        include_deleted: bool,
    ) -> Result<Vec<Character>, RepoError>;

    /// The non-deleted character occupying `slot`, if any.
    async fn get_active_in_slot(
        &self,
        owner_id: OwnerId,
        slot: SlotNumber,
    ) -> Result<Option<Character>, RepoError>;

    /// Replace the stored record. Missing rows return `RepoError::NotFound`.
    async fn update(&self, character: &Character) -> Result<(), RepoError>;

    /// Hard delete. Missing rows return `RepoError::NotFound`.
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;

    /// Case-insensitive; deleted characters keep their names reserved.
    async fn name_exists(&self, name: &str) -> Result<bool, RepoError>;

    async fn count_active_by_owner(&self, owner_id: OwnerId) -> Result<u32, RepoError>;

    /// Most recently selected, still-selected, non-deleted character of an owner.
    async fn find_selected(&self, owner_id: OwnerId) -> Result<Option<Character>, RepoError>;
}

// =============================================================================
// Per-character records
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppearanceRepo: Send + Sync {
    async fn create(&self, appearance: &Appearance) -> Result<(), RepoError>;
    async fn get(&self, character_id: CharacterId) -> Result<Option<Appearance>, RepoError>;
    async fn update(&self, appearance: &Appearance) -> Result<(), RepoError>;
    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn create(&self, stats: &Stats) -> Result<(), RepoError>;
    async fn get(&self, character_id: CharacterId) -> Result<Option<Stats>, RepoError>;
    async fn update(&self, stats: &Stats) -> Result<(), RepoError>;
    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionRepo: Send + Sync {
    async fn create(&self, position: &Position) -> Result<(), RepoError>;
    async fn get(&self, character_id: CharacterId) -> Result<Option<Position>, RepoError>;
    async fn update(&self, position: &Position) -> Result<(), RepoError>;
    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError>;
}
