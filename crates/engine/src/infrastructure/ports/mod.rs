//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Record stores (could swap SQLite -> Postgres)
//! - Caching (could swap the in-process cache -> Redis)
//! - Messaging (could swap the in-process bus -> NATS JetStream)
//! - Clock (for testing)

mod cache;
mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{AppearanceRepo, CharacterRepo, PositionRepo, StatsRepo};

// =============================================================================
// Cache Ports
// =============================================================================
pub use cache::{CacheKey, CacheKind, CharacterCache};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    CachePort, EventPublisherPort, MessageBusPort, RetentionPolicy, StreamConfig, StreamStorage,
    CHARACTER_DLQ_STREAM, CHARACTER_EVENTS_STREAM,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockAppearanceRepo, MockCharacterRepo, MockPositionRepo, MockStatsRepo};

#[cfg(test)]
pub use cache::MockCharacterCache;

#[cfg(test)]
pub use external::{MockCachePort, MockEventPublisherPort, MockMessageBusPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{BusError, CacheError, PublishError, RepoError, NAME_TAKEN, SLOT_OCCUPIED};
