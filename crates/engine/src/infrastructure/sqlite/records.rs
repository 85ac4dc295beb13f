//! One generic store for the three per-character records.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_domain::{Appearance, CharacterId, Position, Stats};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use super::{timestamp, write_error};
use crate::infrastructure::ports::{AppearanceRepo, PositionRepo, RepoError, StatsRepo};

/// A record keyed by its character id and stored as JSON in its own table.
pub trait StoredRecord: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: &'static str;
    const ENTITY: &'static str;

    fn character_id(&self) -> CharacterId;
    fn updated_at(&self) -> DateTime<Utc>;
}

impl StoredRecord for Appearance {
    const TABLE: &'static str = "character_appearance";
    const ENTITY: &'static str = "Appearance";

    fn character_id(&self) -> CharacterId {
        self.character_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl StoredRecord for Stats {
    const TABLE: &'static str = "character_stats";
    const ENTITY: &'static str = "Stats";

    fn character_id(&self) -> CharacterId {
        self.character_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl StoredRecord for Position {
    const TABLE: &'static str = "character_positions";
    const ENTITY: &'static str = "Position";

    fn character_id(&self) -> CharacterId {
        self.character_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

pub struct SqliteRecordRepo<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T: StoredRecord> SqliteRecordRepo<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    fn encode(record: &T) -> Result<String, RepoError> {
        serde_json::to_string(record).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    async fn insert(&self, record: &T) -> Result<(), RepoError> {
        let json = Self::encode(record)?;
        let sql = format!(
            "INSERT INTO {} (character_id, record_json, updated_at) VALUES (?, ?, ?)",
            T::TABLE
        );
        sqlx::query(&sql)
            .bind(record.character_id().to_string())
            .bind(json)
            .bind(timestamp(record.updated_at()))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("create_record", e))?;
        Ok(())
    }

    async fn fetch(&self, character_id: CharacterId) -> Result<Option<T>, RepoError> {
        let sql = format!("SELECT record_json FROM {} WHERE character_id = ?", T::TABLE);
        let row = sqlx::query(&sql)
            .bind(character_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_record", e))?;

        match row {
            Some(row) => {
                let json: String = row
                    .try_get("record_json")
                    .map_err(|e| RepoError::database("get_record", e))?;
                let record = serde_json::from_str(&json)
                    .map_err(|e| RepoError::Serialization(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn replace(&self, record: &T) -> Result<(), RepoError> {
        let json = Self::encode(record)?;
        let sql = format!(
            "UPDATE {} SET record_json = ?, updated_at = ? WHERE character_id = ?",
            T::TABLE
        );
        let result = sqlx::query(&sql)
            .bind(json)
            .bind(timestamp(record.updated_at()))
            .bind(record.character_id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_record", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(T::ENTITY, record.character_id()));
        }
        Ok(())
    }

    async fn remove(&self, character_id: CharacterId) -> Result<(), RepoError> {
        let sql = format!("DELETE FROM {} WHERE character_id = ?", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(character_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_record", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(T::ENTITY, character_id));
        }
        Ok(())
    }
}

#[async_trait]
impl AppearanceRepo for SqliteRecordRepo<Appearance> {
    async fn create(&self, appearance: &Appearance) -> Result<(), RepoError> {
        self.insert(appearance).await
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Appearance>, RepoError> {
        self.fetch(character_id).await
    }

    async fn update(&self, appearance: &Appearance) -> Result<(), RepoError> {
        self.replace(appearance).await
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.remove(character_id).await
    }
}

#[async_trait]
impl StatsRepo for SqliteRecordRepo<Stats> {
    async fn create(&self, stats: &Stats) -> Result<(), RepoError> {
        self.insert(stats).await
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Stats>, RepoError> {
        self.fetch(character_id).await
    }

    async fn update(&self, stats: &Stats) -> Result<(), RepoError> {
        self.replace(stats).await
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.remove(character_id).await
    }
}

#[async_trait]
impl PositionRepo for SqliteRecordRepo<Position> {
    async fn create(&self, position: &Position) -> Result<(), RepoError> {
        self.insert(position).await
    }

    async fn get(&self, character_id: CharacterId) -> Result<Option<Position>, RepoError> {
        self.fetch(character_id).await
    }

    async fn update(&self, position: &Position) -> Result<(), RepoError> {
        self.replace(position).await
    }

    async fn delete(&self, character_id: CharacterId) -> Result<(), RepoError> {
        self.remove(character_id).await
    }
}
