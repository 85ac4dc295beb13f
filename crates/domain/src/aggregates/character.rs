//! Character aggregate - the identity record of a playable character
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: all state changes go through methods
//! - **Newtypes**: `CharacterName` and `SlotNumber` are valid by construction
//! - **Explicit time**: every mutation takes `now` so callers control the clock
//!
//! Appearance, stats and position are separate records keyed by the same
//! `CharacterId` and live in their own stores.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CharacterId, OwnerId};
use crate::value_objects::{CharacterName, ClassType, Gender, Race, SlotNumber};

/// Days a soft-deleted character stays restorable
pub const RESTORE_WINDOW_DAYS: i64 = 30;

/// Level cap
pub const MAX_LEVEL: u32 = 100;

/// Stat points granted per level gained
pub const STAT_POINTS_PER_LEVEL: u32 = 5;

/// Skill points granted per level gained
pub const SKILL_POINTS_PER_LEVEL: u32 = 1;

/// Total experience required to reach `level`: `100 * (level - 1)^2`.
pub fn experience_for_level(level: u32) -> u64 {
    let steps = u64::from(level.clamp(1, MAX_LEVEL) - 1);
    100 * steps * steps
}

/// Highest level whose experience threshold is met, capped at [`MAX_LEVEL`].
pub fn level_for_experience(experience: u64) -> u32 {
    let mut level = 1;
    while level < MAX_LEVEL && experience_for_level(level + 1) <= experience {
        level += 1;
    }
    level
}

/// Result of granting experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub previous_level: u32,
    pub new_level: u32,
    pub experience: u64,
}

impl LevelProgress {
    pub fn levels_gained(&self) -> u32 {
        self.new_level.saturating_sub(self.previous_level)
    }
}

/// A playable character's identity record
///
/// # Invariants
///
/// - `deleted_at` is `Some` exactly when the character is soft-deleted
/// - A deleted character is never marked selected
/// - `level` is always `level_for_experience(experience)`
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use roster_domain::{Character, OwnerId};
/// use roster_domain::value_objects::{CharacterName, ClassType, Gender, NamePolicy, Race, SlotNumber};
///
/// let name = CharacterName::parse("Thane", &NamePolicy::default()).unwrap();
/// let character = Character::new(
///     OwnerId::new(),
///     name,
///     SlotNumber::new(1).unwrap(),
///     ClassType::Warrior,
///     Race::Dwarf,
///     Gender::Male,
///     Utc::now(),
/// );
///
/// assert_eq!(character.level(), 1);
/// assert!(!character.is_deleted());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    // Identity
    id: CharacterId,
    owner_id: OwnerId,
    name: CharacterName,
    slot: SlotNumber,

    // Creation choices
    class: ClassType,
    race: Race,
    gender: Gender,

    // Progression
    level: u32,
    experience: u64,

    // Lifecycle
    deleted_at: Option<DateTime<Utc>>,
    selected: bool,

    // Bookkeeping
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_played_at: DateTime<Utc>,
    last_selected_at: Option<DateTime<Utc>>,
    total_play_time_secs: i64,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(
        owner_id: OwnerId,
        name: CharacterName,
        slot: SlotNumber,
        class: ClassType,
        race: Race,
        gender: Gender,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CharacterId::new(),
            owner_id,
            name,
            slot,
            class,
            race,
            gender,
            level: 1,
            experience: 0,
            deleted_at: None,
            selected: false,
            created_at: now,
            updated_at: now,
            last_played_at: now,
            last_selected_at: None,
            total_play_time_secs: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn slot(&self) -> SlotNumber {
        self.slot
    }

    #[inline]
    pub fn class(&self) -> ClassType {
        self.class
    }

    #[inline]
    pub fn race(&self) -> Race {
        self.race
    }

    #[inline]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn experience(&self) -> u64 {
        self.experience
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Restores are accepted strictly before this instant.
    pub fn restore_deadline(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
            .map(|deleted_at| deleted_at + Duration::days(RESTORE_WINDOW_DAYS))
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn last_played_at(&self) -> DateTime<Utc> {
        self.last_played_at
    }

    #[inline]
    pub fn last_selected_at(&self) -> Option<DateTime<Utc>> {
        self.last_selected_at
    }

    pub fn total_play_time(&self) -> Duration {
        Duration::seconds(self.total_play_time_secs)
    }

    /// Whether `owner_id` owns this character.
    pub fn is_owned_by(&self, owner_id: OwnerId) -> bool {
        self.owner_id == owner_id
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mark the character deleted. The record is kept for the restore window.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::invalid_state_transition(
                "Character is already deleted",
            ));
        }
        self.deleted_at = Some(now);
        self.selected = false;
        self.updated_at = now;
        Ok(())
    }

    pub fn can_be_restored(&self, now: DateTime<Utc>) -> bool {
        self.restore_deadline()
            .is_some_and(|deadline| now < deadline)
    }

    pub fn restore(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.can_be_restored(now) {
            return Err(DomainError::CannotBeRestored);
        }
        self.deleted_at = None;
        self.updated_at = now;
        Ok(())
    }

    // =========================================================================
    // Selection and activity
    // =========================================================================

    pub fn select(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::invalid_state_transition(
                "Cannot select a deleted character",
            ));
        }
        self.selected = true;
        self.last_selected_at = Some(now);
        self.last_played_at = now;
        self.updated_at = now;
        Ok(())
    }

    /// Clear the selection marker. Returns `false` if nothing changed.
    pub fn deselect(&mut self, now: DateTime<Utc>) -> bool {
        if !self.selected {
            return false;
        }
        self.selected = false;
        self.updated_at = now;
        true
    }

    /// Add a finished session's play time and bump the last-played timestamp.
    pub fn record_play(&mut self, session: Duration, now: DateTime<Utc>) {
        self.total_play_time_secs += session.num_seconds().max(0);
        self.last_played_at = now;
        self.updated_at = now;
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Add experience and recompute the level on the fixed curve.
    pub fn grant_experience(&mut self, amount: u64, now: DateTime<Utc>) -> LevelProgress {
        let previous_level = self.level;
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_experience(self.experience);
        self.updated_at = now;
        LevelProgress {
            previous_level,
            new_level: self.level,
            experience: self.experience,
        }
    }
}
