//! SQLite-backed character record stores.
//!
//! Each store keeps the full record as JSON plus the handful of columns its
//! queries filter or order on. Uniqueness rules live in the schema.

mod characters;
mod records;

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::infrastructure::ports::{AppearanceRepo, CharacterRepo, PositionRepo, RepoError, StatsRepo};

pub use characters::SqliteCharacterRepo;
pub use records::{SqliteRecordRepo, StoredRecord};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        slot INTEGER NOT NULL,
        name_key TEXT NOT NULL,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        selected INTEGER NOT NULL DEFAULT 0,
        last_selected_at TEXT,
        record_json TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_characters_active_name
        ON characters (name_key) WHERE is_deleted = 0
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_characters_active_slot
        ON characters (owner_id, slot) WHERE is_deleted = 0
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_characters_owner
        ON characters (owner_id, is_deleted)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_appearance (
        character_id TEXT PRIMARY KEY,
        record_json TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_stats (
        character_id TEXT PRIMARY KEY,
        record_json TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_positions (
        character_id TEXT PRIMARY KEY,
        record_json TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// All four stores sharing one pool.
#[derive(Clone)]
pub struct SqliteRepositories {
    pub characters: Arc<dyn CharacterRepo>,
    pub appearance: Arc<dyn AppearanceRepo>,
    pub stats: Arc<dyn StatsRepo>,
    pub positions: Arc<dyn PositionRepo>,
}

impl SqliteRepositories {
    /// Open (or create) the database file at `db_path`.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        tracing::info!(db_path, "Opened character database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database. A single connection that never idles out,
    /// since the data lives only as long as it does.
    pub async fn in_memory() -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        ensure_schema(&pool).await?;
        Ok(Self {
            characters: Arc::new(SqliteCharacterRepo::new(pool.clone())),
            appearance: Arc::new(SqliteRecordRepo::<roster_domain::Appearance>::new(pool.clone())),
            stats: Arc::new(SqliteRecordRepo::<roster_domain::Stats>::new(pool.clone())),
            positions: Arc::new(SqliteRecordRepo::<roster_domain::Position>::new(pool)),
        })
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    tracing::debug!(statements = SCHEMA.len(), "Character schema ensured");
    Ok(())
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
pub(crate) fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Map a write failure, surfacing uniqueness rules as constraint violations.
pub(crate) fn write_error(operation: &'static str, error: sqlx::Error) -> RepoError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::constraint(db.message())
        }
        _ => RepoError::database(operation, error),
    }
}
