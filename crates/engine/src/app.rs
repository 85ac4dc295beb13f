//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    background::BackgroundPublisher,
    cache::InMemoryCache,
    character_cache::{KeyValueCharacterCache, NoopCharacterCache},
    config::EngineConfig,
    event_publisher::RetryingEventPublisher,
    message_bus::InMemoryMessageBus,
    ports::{BusError, CharacterCache, ClockPort, MessageBusPort, RepoError},
    sqlite::SqliteRepositories,
};
use crate::use_cases::character::{CharacterDeps, CharacterPolicy, CharacterStores};
use crate::use_cases::CharacterUseCases;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Store setup failed: {0}")]
    Store(#[from] RepoError),

    #[error("Stream setup failed: {0}")]
    Bus(#[from] BusError),
}

/// Main application state.
///
/// Owns the adapters and the character use cases built on them.
pub struct App {
    pub config: EngineConfig,
    pub use_cases: CharacterUseCases,
    pub publisher: Arc<RetryingEventPublisher>,
    pub background: BackgroundPublisher,
    pub bus: Arc<dyn MessageBusPort>,
    /// Backing key-value store; `None` when caching is disabled.
    pub cache_store: Option<Arc<InMemoryCache>>,
}

impl App {
    /// Open the SQLite database named in `config` and compose the app on it.
    pub async fn new(config: EngineConfig, clock: Arc<dyn ClockPort>) -> Result<Self, AppError> {
        let repos = SqliteRepositories::connect(&config.db_path).await?;
        Self::with_repositories(config, repos, clock).await
    }

    /// Compose the app on already-opened stores with the in-process bus.
    pub async fn with_repositories(
        config: EngineConfig,
        repos: SqliteRepositories,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, AppError> {
        Self::compose(config, repos, Arc::new(InMemoryMessageBus::new()), clock).await
    }

    /// Compose the app on already-opened stores and bus. Streams are ensured
    /// here, once, before any use case can publish.
    pub async fn compose(
        config: EngineConfig,
        repos: SqliteRepositories,
        bus: Arc<dyn MessageBusPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, AppError> {
        let publisher = Arc::new(RetryingEventPublisher::new(
            bus.clone(),
            clock.clone(),
            config.publish,
        ));
        publisher.ensure_streams().await?;

        let (cache, cache_store) = if config.cache_enabled {
            let store = Arc::new(InMemoryCache::new());
            let cache: Arc<dyn CharacterCache> = Arc::new(KeyValueCharacterCache::new(
                store.clone(),
                config.cache_prefix.clone(),
                config.cache_ttl,
            ));
            (cache, Some(store))
        } else {
            tracing::info!("Character cache disabled");
            let cache: Arc<dyn CharacterCache> = Arc::new(NoopCharacterCache);
            (cache, None)
        };

        let background = BackgroundPublisher::new(publisher.clone());
        let deps = CharacterDeps {
            stores: CharacterStores {
                characters: repos.characters,
                appearance: repos.appearance,
                stats: repos.stats,
                positions: repos.positions,
            },
            cache,
            publisher: publisher.clone(),
            background: background.clone(),
            clock,
            policy: CharacterPolicy {
                max_per_owner: config.max_per_owner,
                name_policy: config.name_policy,
                selection_window: config.selection_window,
            },
        };

        tracing::info!(
            db_path = %config.db_path,
            max_per_owner = config.max_per_owner,
            cache_enabled = config.cache_enabled,
            publish_attempts = config.publish.max_attempts,
            "Character service composed"
        );

        Ok(Self {
            use_cases: CharacterUseCases::new(deps),
            publisher,
            background,
            bus,
            cache_store,
            config,
        })
    }

    /// Drop expired cache entries. Returns how many were removed.
    pub async fn sweep_cache(&self) -> usize {
        match &self.cache_store {
            Some(store) => store.sweep().await,
            None => 0,
        }
    }

    /// Wait for background publishes to finish.
    pub async fn shutdown(&self) {
        let saga = self.use_cases.create.metrics().snapshot();
        tracing::info!(
            sagas_started = saga.started,
            sagas_completed = saga.completed,
            sagas_failed = saga.failed,
            compensation_failures = saga.compensation_failures,
            "Shutting down character service"
        );
        self.background.drain().await;
    }
}
