use async_trait::async_trait;
use roster_domain::value_objects::SlotNumber;
use roster_domain::{Character, CharacterId, OwnerId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{timestamp, write_error};
use crate::infrastructure::ports::{CharacterRepo, RepoError, NAME_TAKEN, SLOT_OCCUPIED};

/// Identity records. Names and owner slots are unique among active rows only,
/// so soft-deleting a character frees both.
pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn decode(row: &SqliteRow) -> Result<Character, RepoError> {
        let json: String = row
            .try_get("record_json")
            .map_err(|e| RepoError::database("decode_character", e))?;
        serde_json::from_str(&json).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    fn encode(character: &Character) -> Result<String, RepoError> {
        serde_json::to_string(character).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    /// Tell the two uniqueness rules apart for callers.
    fn constraint_error(operation: &'static str, error: sqlx::Error) -> RepoError {
        match write_error(operation, error) {
            RepoError::ConstraintViolation(message) if message.contains("name_key") => {
                RepoError::constraint(NAME_TAKEN)
            }
            RepoError::ConstraintViolation(message) if message.contains("slot") => {
                RepoError::constraint(SLOT_OCCUPIED)
            }
            other => other,
        }
    }

    async fn fetch_one_where(
        &self,
        operation: &'static str,
        sql: &str,
        bind: String,
    ) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query(sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?;
        row.as_ref().map(Self::decode).transpose()
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn create(&self, character: &Character) -> Result<(), RepoError> {
        let json = Self::encode(character)?;
        sqlx::query(
            r#"
            INSERT INTO characters
                (id, owner_id, slot, name_key, is_deleted, selected, last_selected_at,
                 record_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(character.id().to_string())
        .bind(character.owner_id().to_string())
        .bind(i64::from(character.slot().get()))
        .bind(character.name().lookup_key())
        .bind(character.is_deleted())
        .bind(character.is_selected())
        .bind(character.last_selected_at().map(timestamp))
        .bind(json)
        .bind(timestamp(character.created_at()))
        .bind(timestamp(character.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::constraint_error("create_character", e))?;

        Ok(())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        self.fetch_one_where(
            "get_character",
            "SELECT record_json FROM characters WHERE id = ?",
            id.to_string(),
        )
        .await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepoError> {
        self.fetch_one_where(
            "get_character_by_name",
            r#"
            SELECT record_json FROM characters
            WHERE name_key = ?
            ORDER BY is_deleted, updated_at DESC
            LIMIT 1
            "#,
            name.to_ascii_lowercase(),
        )
        .await
    }

    async fn list_by_owner(
        &self,
        owner_id: OwnerId,
        include_deleted: bool,
    ) -> Result<Vec<Character>, RepoError> {
        let sql = if include_deleted {
            "SELECT record_json FROM characters WHERE owner_id = ? ORDER BY slot, created_at"
        } else {
            "SELECT record_json FROM characters WHERE owner_id = ? AND is_deleted = 0 ORDER BY slot"
        };
        let rows = sqlx::query(sql)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_characters", e))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn get_active_in_slot(
        &self,
        owner_id: OwnerId,
        slot: SlotNumber,
    ) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query(
            "SELECT record_json FROM characters WHERE owner_id = ? AND slot = ? AND is_deleted = 0",
        )
        .bind(owner_id.to_string())
        .bind(i64::from(slot.get()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_character_in_slot", e))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let json = Self::encode(character)?;
        let result = sqlx::query(
            r#"
            UPDATE characters SET
                slot = ?,
                name_key = ?,
                is_deleted = ?,
                selected = ?,
                last_selected_at = ?,
                record_json = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(i64::from(character.slot().get()))
        .bind(character.name().lookup_key())
        .bind(character.is_deleted())
        .bind(character.is_selected())
        .bind(character.last_selected_at().map(timestamp))
        .bind(json)
        .bind(timestamp(character.updated_at()))
        .bind(character.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::constraint_error("update_character", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", character.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }
        Ok(())
    }

    async fn name_exists(&self, name: &str) -> Result<bool, RepoError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM characters WHERE name_key = ? AND is_deleted = 0",
        )
        .bind(name.to_ascii_lowercase())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("name_exists", e))?;
        let count: i64 = row
            .try_get("n")
            .map_err(|e| RepoError::database("name_exists", e))?;
        Ok(count > 0)
    }

    async fn count_active_by_owner(&self, owner_id: OwnerId) -> Result<u32, RepoError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM characters WHERE owner_id = ? AND is_deleted = 0",
        )
        .bind(owner_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("count_characters", e))?;
        let count: i64 = row
            .try_get("n")
            .map_err(|e| RepoError::database("count_characters", e))?;
        u32::try_from(count).map_err(|e| RepoError::database("count_characters", e))
    }

    async fn find_selected(&self, owner_id: OwnerId) -> Result<Option<Character>, RepoError> {
        self.fetch_one_where(
            "find_selected_character",
            r#"
            SELECT record_json FROM characters
            WHERE owner_id = ? AND selected = 1 AND is_deleted = 0
            ORDER BY last_selected_at DESC
            LIMIT 1
            "#,
            owner_id.to_string(),
        )
        .await
    }
}
