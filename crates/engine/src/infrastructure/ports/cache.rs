//! Character-level cache port.
//!
//! The cache is strictly cache-aside: reads populate it, mutations only ever
//! remove keys. Implementations never need to be consistent with the stores.

use async_trait::async_trait;
use roster_domain::{Appearance, Character, CharacterId, OwnerId, Position, Stats};

use super::error::CacheError;

/// Which cached view a key holds; each kind has its own TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Character,
    CharacterList,
    CharacterCount,
    SelectedCharacter,
    Appearance,
    Stats,
    Position,
}

/// A single cached view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Character(CharacterId),
    CharacterList(OwnerId),
    CharacterCount(OwnerId),
    SelectedCharacter(OwnerId),
    Appearance(CharacterId),
    Stats(CharacterId),
    Position(CharacterId),
}

impl CacheKey {
    pub fn kind(&self) -> CacheKind {
        match self {
            CacheKey::Character(_) => CacheKind::Character,
            CacheKey::CharacterList(_) => CacheKind::CharacterList,
            CacheKey::CharacterCount(_) => CacheKind::CharacterCount,
            CacheKey::SelectedCharacter(_) => CacheKind::SelectedCharacter,
            CacheKey::Appearance(_) => CacheKind::Appearance,
            CacheKey::Stats(_) => CacheKind::Stats,
            CacheKey::Position(_) => CacheKind::Position,
        }
    }

    /// Namespaced key string, e.g. `character:stats:<id>`.
    pub fn render(&self, prefix: &str) -> String {
        match self {
            CacheKey::Character(id) => format!("{prefix}:character:{id}"),
            CacheKey::CharacterList(owner) => format!("{prefix}:user_characters:{owner}"),
            CacheKey::CharacterCount(owner) => format!("{prefix}:character_count:{owner}"),
            CacheKey::SelectedCharacter(owner) => format!("{prefix}:selected_character:{owner}"),
            CacheKey::Appearance(id) => format!("{prefix}:appearance:{id}"),
            CacheKey::Stats(id) => format!("{prefix}:stats:{id}"),
            CacheKey::Position(id) => format!("{prefix}:position:{id}"),
        }
    }

    /// Every per-character view.
    pub fn all_for_character(id: CharacterId) -> [CacheKey; 4] {
        [
            CacheKey::Character(id),
            CacheKey::Appearance(id),
            CacheKey::Stats(id),
            CacheKey::Position(id),
        ]
    }

    /// Every per-owner view.
    pub fn all_for_owner(owner: OwnerId) -> [CacheKey; 3] {
        [
            CacheKey::CharacterList(owner),
            CacheKey::CharacterCount(owner),
            CacheKey::SelectedCharacter(owner),
        ]
    }

    /// Views that embed the identity record.
    pub fn identity(id: CharacterId, owner: OwnerId) -> [CacheKey; 2] {
        [CacheKey::Character(id), CacheKey::CharacterList(owner)]
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterCache: Send + Sync {
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, CacheError>;
    async fn set_character(&self, character: &Character) -> Result<(), CacheError>;

    async fn get_character_list(
        &self,
        owner_id: OwnerId,
    ) -> Result<Option<Vec<Character>>, CacheError>;
    async fn set_character_list(
        &self,
        owner_id: OwnerId,
        characters: &[Character],
    ) -> Result<(), CacheError>;

    async fn get_character_count(&self, owner_id: OwnerId) -> Result<Option<u32>, CacheError>;
    async fn set_character_count(&self, owner_id: OwnerId, count: u32) -> Result<(), CacheError>;

    async fn get_selected_character(
        &self,
        owner_id: OwnerId,
    ) -> Result<Option<CharacterId>, CacheError>;
    async fn set_selected_character(
        &self,
        owner_id: OwnerId,
        character_id: CharacterId,
    ) -> Result<(), CacheError>;

    async fn get_appearance(&self, id: CharacterId) -> Result<Option<Appearance>, CacheError>;
    async fn set_appearance(&self, appearance: &Appearance) -> Result<(), CacheError>;

    async fn get_stats(&self, id: CharacterId) -> Result<Option<Stats>, CacheError>;
    async fn set_stats(&self, stats: &Stats) -> Result<(), CacheError>;

    async fn get_position(&self, id: CharacterId) -> Result<Option<Position>, CacheError>;
    async fn set_position(&self, position: &Position) -> Result<(), CacheError>;

    /// Remove the given views in one call.
    async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), CacheError>;
}
