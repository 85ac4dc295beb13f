//! Character cache adapters.
//!
//! [`KeyValueCharacterCache`] stores JSON-encoded records in any [`CachePort`]
//! under `{prefix}:{kind}:{id}` keys. [`NoopCharacterCache`] always misses and
//! is used when caching is switched off.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use roster_domain::{Appearance, Character, CharacterId, OwnerId, Position, Stats};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::{CacheError, CacheKey, CacheKind, CachePort, CharacterCache};

pub const DEFAULT_CACHE_PREFIX: &str = "character";

/// Time-to-live per cached view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub character: Duration,
    pub character_list: Duration,
    pub character_count: Duration,
    pub selected_character: Duration,
    pub appearance: Duration,
    pub stats: Duration,
    pub position: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            character: Duration::from_secs(10 * 60),
            character_list: Duration::from_secs(5 * 60),
            character_count: Duration::from_secs(60),
            selected_character: Duration::from_secs(24 * 60 * 60),
            appearance: Duration::from_secs(10 * 60),
            stats: Duration::from_secs(10 * 60),
            position: Duration::from_secs(30),
        }
    }
}

impl CacheTtl {
    pub fn for_kind(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::Character => self.character,
            CacheKind::CharacterList => self.character_list,
            CacheKind::CharacterCount => self.character_count,
            CacheKind::SelectedCharacter => self.selected_character,
            CacheKind::Appearance => self.appearance,
            CacheKind::Stats => self.stats,
            CacheKind::Position => self.position,
        }
    }
}

pub struct KeyValueCharacterCache {
    store: Arc<dyn CachePort>,
    prefix: String,
    ttl: CacheTtl,
}

impl KeyValueCharacterCache {
    pub fn new(store: Arc<dyn CachePort>, prefix: impl Into<String>, ttl: CacheTtl) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            ttl,
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: CacheKey) -> Result<Option<T>, CacheError> {
        let Some(bytes) = self.store.get(&key.render(&self.prefix)).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    async fn write<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) -> Result<(), CacheError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.store
            .set(&key.render(&self.prefix), bytes, self.ttl.for_kind(key.kind()))
            .await
    }
}

#[async_trait]
impl CharacterCache for KeyValueCharacterCache {
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, CacheError> {
        self.read(CacheKey::Character(id)).await
    }

    async fn set_character(&self, character: &Character) -> Result<(), CacheError> {
        self.write(CacheKey::Character(character.id()), character).await
    }

    async fn get_character_list(
        &self,
        owner_id: OwnerId,
    ) -> Result<Option<Vec<Character>>, CacheError> {
        self.read(CacheKey::CharacterList(owner_id)).await
    }

    async fn set_character_list(
        &self,
        owner_id: OwnerId,
        characters: &[Character],
    ) -> Result<(), CacheError> {
        self.write(CacheKey::CharacterList(owner_id), characters).await
    }

    async fn get_character_count(&self, owner_id: OwnerId) -> Result<Option<u32>, CacheError> {
        self.read(CacheKey::CharacterCount(owner_id)).await
    }

    async fn set_character_count(&self, owner_id: OwnerId, count: u32) -> Result<(), CacheError> {
        self.write(CacheKey::CharacterCount(owner_id), &count).await
    }

    async fn get_selected_character(
        &self,
        owner_id: OwnerId,
    ) -> Result<Option<CharacterId>, CacheError> {
        self.read(CacheKey::SelectedCharacter(owner_id)).await
    }

    async fn set_selected_character(
        &self,
        owner_id: OwnerId,
        character_id: CharacterId,
    ) -> Result<(), CacheError> {
        self.write(CacheKey::SelectedCharacter(owner_id), &character_id)
            .await
    }

    async fn get_appearance(&self, id: CharacterId) -> Result<Option<Appearance>, CacheError> {
        self.read(CacheKey::Appearance(id)).await
    }

    async fn set_appearance(&self, appearance: &Appearance) -> Result<(), CacheError> {
        self.write(CacheKey::Appearance(appearance.character_id), appearance)
            .await
    }

    async fn get_stats(&self, id: CharacterId) -> Result<Option<Stats>, CacheError> {
        self.read(CacheKey::Stats(id)).await
    }

    async fn set_stats(&self, stats: &Stats) -> Result<(), CacheError> {
        self.write(CacheKey::Stats(stats.character_id), stats).await
    }

    async fn get_position(&self, id: CharacterId) -> Result<Option<Position>, CacheError> {
        self.read(CacheKey::Position(id)).await
    }

    async fn set_position(&self, position: &Position) -> Result<(), CacheError> {
        self.write(CacheKey::Position(position.character_id), position)
            .await
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let rendered: Vec<String> = keys.iter().map(|key| key.render(&self.prefix)).collect();
        self.store.delete(&rendered).await
    }
}

/// Cache that stores nothing. Every read is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCharacterCache;

#[async_trait]
impl CharacterCache for NoopCharacterCache {
    async fn get_character(&self, _id: CharacterId) -> Result<Option<Character>, CacheError> {
        Ok(None)
    }

    async fn set_character(&self, _character: &Character) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_character_list(
        &self,
        _owner_id: OwnerId,
    ) -> Result<Option<Vec<Character>>, CacheError> {
        Ok(None)
    }

    async fn set_character_list(
        &self,
        _owner_id: OwnerId,
        _characters: &[Character],
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_character_count(&self, _owner_id: OwnerId) -> Result<Option<u32>, CacheError> {
        Ok(None)
    }

    async fn set_character_count(&self, _owner_id: OwnerId, _count: u32) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_selected_character(
        &self,
        _owner_id: OwnerId,
    ) -> Result<Option<CharacterId>, CacheError> {
        Ok(None)
    }

    async fn set_selected_character(
        &self,
        _owner_id: OwnerId,
        _character_id: CharacterId,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_appearance(&self, _id: CharacterId) -> Result<Option<Appearance>, CacheError> {
        Ok(None)
    }

    async fn set_appearance(&self, _appearance: &Appearance) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_stats(&self, _id: CharacterId) -> Result<Option<Stats>, CacheError> {
        Ok(None)
    }

    async fn set_stats(&self, _stats: &Stats) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_position(&self, _id: CharacterId) -> Result<Option<Position>, CacheError> {
        Ok(None)
    }

    async fn set_position(&self, _position: &Position) -> Result<(), CacheError> {
        Ok(())
    }

    async fn invalidate(&self, _keys: &[CacheKey]) -> Result<(), CacheError> {
        Ok(())
    }
}
