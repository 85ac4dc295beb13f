//! Read-side character operations.
//!
//! Every read probes the cache first. On a miss the store is read and the
//! cache populated, except for soft-deleted characters which are never cached.

use roster_domain::{Appearance, Character, CharacterId, OwnerId, Position, Stats};

use super::cache_aside::{populate, probe};
use super::{CharacterDeps, CharacterError};

pub struct CharacterQueries {
    deps: CharacterDeps,
}

impl CharacterQueries {
    pub fn new(deps: CharacterDeps) -> Self {
        Self { deps }
    }

    /// Active character by id. A soft-deleted one is reported as [`CharacterError::Deleted`].
    pub async fn get_character(&self, id: CharacterId) -> Result<Character, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(character) = probe("character", cache.get_character(id)).await {
            return Ok(character);
        }

        let character = self.deps.load_active(id).await?;
        populate("character", cache.set_character(&character)).await;
        Ok(character)
    }

    /// Case-insensitive name lookup.
    pub async fn get_character_by_name(&self, name: &str) -> Result<Character, CharacterError> {
        let character = self
            .deps
            .stores
            .characters
            .get_by_name(name)
            .await?
            .ok_or_else(|| CharacterError::NameNotFound(name.to_string()))?;
        if character.is_deleted() {
            return Err(CharacterError::Deleted(character.id()));
        }

        populate("character", self.deps.cache.set_character(&character)).await;
        Ok(character)
    }

    /// Non-deleted characters of an owner, in slot order.
    pub async fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Character>, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(characters) = probe("character_list", cache.get_character_list(owner_id)).await {
            return Ok(characters);
        }

        let characters = self
            .deps
            .stores
            .characters
            .list_by_owner(owner_id, false)
            .await?;
        populate(
            "character_list",
            cache.set_character_list(owner_id, &characters),
        )
        .await;
        Ok(characters)
    }

    /// Number of non-deleted characters an owner holds.
    pub async fn count(&self, owner_id: OwnerId) -> Result<u32, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(count) = probe("character_count", cache.get_character_count(owner_id)).await {
            return Ok(count);
        }

        let count = self
            .deps
            .stores
            .characters
            .count_active_by_owner(owner_id)
            .await?;
        populate("character_count", cache.set_character_count(owner_id, count)).await;
        Ok(count)
    }

    pub async fn can_create(&self, owner_id: OwnerId) -> Result<bool, CharacterError> {
        Ok(self.count(owner_id).await? < self.deps.policy.max_per_owner)
    }

    pub async fn get_appearance(&self, id: CharacterId) -> Result<Appearance, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(appearance) = probe("appearance", cache.get_appearance(id)).await {
            return Ok(appearance);
        }

        self.deps.load_active(id).await?;
        let appearance = self
            .deps
            .stores
            .appearance
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound {
                kind: "Appearance",
                id,
            })?;
        populate("appearance", cache.set_appearance(&appearance)).await;
        Ok(appearance)
    }

    pub async fn get_stats(&self, id: CharacterId) -> Result<Stats, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(stats) = probe("stats", cache.get_stats(id)).await {
            return Ok(stats);
        }

        self.deps.load_active(id).await?;
        let stats = self
            .deps
            .stores
            .stats
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound { kind: "Stats", id })?;
        populate("stats", cache.set_stats(&stats)).await;
        Ok(stats)
    }

    pub async fn get_position(&self, id: CharacterId) -> Result<Position, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(position) = probe("position", cache.get_position(id)).await {
            return Ok(position);
        }

        self.deps.load_active(id).await?;
        let position = self
            .deps
            .stores
            .positions
            .get(id)
            .await?
            .ok_or(CharacterError::RecordNotFound {
                kind: "Position",
                id,
            })?;
        populate("position", cache.set_position(&position)).await;
        Ok(position)
    }

    /// The owner's current character.
    ///
    /// The cached selection is trusted while it points at a live, selected
    /// character. Otherwise the store's most recent selection counts only if
    /// it happened within the configured selection window.
    pub async fn get_selected(&self, owner_id: OwnerId) -> Result<Character, CharacterError> {
        let cache = &self.deps.cache;
        if let Some(id) = probe("selected_character", cache.get_selected_character(owner_id)).await {
            match self.get_character(id).await {
                Ok(character) if character.is_selected() && character.is_owned_by(owner_id) => {
                    return Ok(character);
                }
                Ok(_) | Err(CharacterError::NotFound(_)) | Err(CharacterError::Deleted(_)) => {
                    tracing::debug!(%owner_id, character_id = %id, "Cached selection is stale");
                }
                Err(e) => return Err(e),
            }
        }

        let character = self
            .deps
            .stores
            .characters
            .find_selected(owner_id)
            .await?
            .ok_or(CharacterError::NoCharacterSelected)?;

        let now = self.deps.clock.now();
        let window = self.deps.policy.selection_window;
        let fresh = character.last_selected_at().is_some_and(|at| {
            now.signed_duration_since(at)
                .to_std()
                .map_or(true, |age| age <= window)
        });
        if !fresh || character.is_deleted() {
            return Err(CharacterError::NoCharacterSelected);
        }

        populate(
            "selected_character",
            cache.set_selected_character(owner_id, character.id()),
        )
        .await;
        populate("character", cache.set_character(&character)).await;
        Ok(character)
    }

    /// Ok when `owner_id` owns the character, deleted or not.
    pub async fn validate_ownership(
        &self,
        id: CharacterId,
        owner_id: OwnerId,
    ) -> Result<(), CharacterError> {
        self.deps.load_owned(id, owner_id).await.map(|_| ())
    }
}
