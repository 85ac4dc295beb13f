//! E2E test helpers for constructing the full application stack.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use roster_domain::value_objects::{ClassType, Gender, Race};
use roster_domain::{AppearancePatch, EventEnvelope, OwnerId};

use crate::app::{App, AppError};
use crate::infrastructure::clock::SteppingClock;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::event_publisher::PublishConfig;
use crate::infrastructure::message_bus::InMemoryMessageBus;
use crate::infrastructure::ports::MessageBusPort;
use crate::infrastructure::sqlite::SqliteRepositories;
use crate::use_cases::character::NewCharacter;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// Defaults, with a retry backoff short enough to run in real time.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        db_path: ":memory:".to_string(),
        publish: PublishConfig {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(1),
        },
        ..EngineConfig::default()
    }
}

pub fn new_character(owner_id: OwnerId, name: &str, slot: i32, class: ClassType) -> NewCharacter {
    NewCharacter {
        owner_id,
        name: name.to_string(),
        slot,
        class,
        race: Race::Dwarf,
        gender: Gender::Male,
        appearance: AppearancePatch::default(),
    }
}

/// Warrior "Thane" in slot 1.
pub fn thane(owner_id: OwnerId) -> NewCharacter {
    new_character(owner_id, "Thane", 1, ClassType::Warrior)
}

/// Fully wired app plus direct handles on what it was built from.
pub struct E2ETestContext {
    pub app: App,
    /// The same stores the app writes, for assertions that bypass the cache.
    pub repos: SqliteRepositories,
    pub clock: Arc<SteppingClock>,
    pub bus: Arc<InMemoryMessageBus>,
}

impl E2ETestContext {
    pub async fn setup() -> Result<Self, AppError> {
        Self::setup_with(|repos| repos, |bus| bus).await
    }

    /// Build the app with decorated stores and/or bus.
    pub async fn setup_with(
        wrap_repos: impl FnOnce(SqliteRepositories) -> SqliteRepositories,
        wrap_bus: impl FnOnce(Arc<dyn MessageBusPort>) -> Arc<dyn MessageBusPort>,
    ) -> Result<Self, AppError> {
        Self::compose(test_config(), wrap_repos, wrap_bus).await
    }

    pub async fn setup_with_config(config: EngineConfig) -> Result<Self, AppError> {
        Self::compose(config, |repos| repos, |bus| bus).await
    }

    async fn compose(
        config: EngineConfig,
        wrap_repos: impl FnOnce(SqliteRepositories) -> SqliteRepositories,
        wrap_bus: impl FnOnce(Arc<dyn MessageBusPort>) -> Arc<dyn MessageBusPort>,
    ) -> Result<Self, AppError> {
        let repos = SqliteRepositories::in_memory().await?;
        let clock = Arc::new(SteppingClock::new(start_time()));
        let bus = Arc::new(InMemoryMessageBus::new());
        let transport: Arc<dyn MessageBusPort> = bus.clone();

        let app = App::compose(
            config,
            wrap_repos(repos.clone()),
            wrap_bus(transport),
            clock.clone(),
        )
        .await?;

        Ok(Self {
            app,
            repos,
            clock,
            bus,
        })
    }

    /// Envelopes recorded on `subject`, oldest first.
    pub async fn events_on(&self, subject: &str) -> Vec<EventEnvelope> {
        self.bus
            .messages_on(subject)
            .await
            .into_iter()
            .map(|message| serde_json::from_slice(&message.payload).unwrap())
            .collect()
    }
}
