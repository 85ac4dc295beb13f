//! External service port traits (key-value cache, message bus, event publishing).

use std::time::Duration;

use async_trait::async_trait;
use roster_domain::{CharacterEvent, CharacterId, EventId, OwnerId};

use super::error::{BusError, CacheError, PublishError};

// =============================================================================
// Key-value cache
// =============================================================================

/// Byte-level TTL cache. Values are opaque; the character cache owns encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CachePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
    /// Missing keys are not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
}

// =============================================================================
// Message bus
// =============================================================================

pub const CHARACTER_EVENTS_STREAM: &str = "CHARACTER_EVENTS";
pub const CHARACTER_DLQ_STREAM: &str = "CHARACTER_EVENTS_DLQ";

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const GIB: u64 = 1024 * 1024 * 1024;

/// Messages are discarded only when a limit is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    Limits,
    Interest,
    WorkQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStorage {
    File,
    Memory,
}

/// Durable stream definition, created idempotently at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub name: String,
    pub subjects: Vec<String>,
    pub retention: RetentionPolicy,
    pub max_age: Duration,
    pub max_bytes: u64,
    pub max_messages: u64,
    pub storage: StreamStorage,
}

impl StreamConfig {
    /// Every `character.>` subject, kept 30 days.
    pub fn character_events() -> Self {
        Self {
            name: CHARACTER_EVENTS_STREAM.to_string(),
            subjects: vec!["character.>".to_string()],
            retention: RetentionPolicy::Limits,
            max_age: 30 * DAY,
            max_bytes: 10 * GIB,
            max_messages: 1_000_000,
            storage: StreamStorage::File,
        }
    }

    /// Undeliverable events, kept 90 days.
    pub fn character_dead_letters() -> Self {
        Self {
            name: CHARACTER_DLQ_STREAM.to_string(),
            subjects: vec!["character.dlq.>".to_string()],
            retention: RetentionPolicy::Limits,
            max_age: 90 * DAY,
            max_bytes: GIB,
            max_messages: 100_000,
            storage: StreamStorage::File,
        }
    }

    /// Whether `subject` falls under one of this stream's patterns.
    ///
    /// Patterns follow the usual token rules: `*` matches one token, a
    /// trailing `>` matches one or more.
    pub fn captures(&self, subject: &str) -> bool {
        self.subjects
            .iter()
            .any(|pattern| subject_matches(pattern, subject))
    }
}

fn subject_matches(pattern: &str, subject: &str) -> bool {
    let mut pattern_tokens = pattern.split('.');
    let mut subject_tokens = subject.split('.');
    loop {
        match (pattern_tokens.next(), subject_tokens.next()) {
            (Some(">"), Some(_)) => return true,
            (Some("*"), Some(_)) => {}
            (Some(p), Some(s)) if p == s => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBusPort: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError>;
    /// Create the stream if missing, otherwise reconcile its limits.
    async fn ensure_stream(&self, config: &StreamConfig) -> Result<(), BusError>;
}

// =============================================================================
// Event publishing
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Wrap `event` in an envelope and deliver it. The returned id is the one
    /// stamped on every attempt, including a dead-letter copy.
    async fn publish(
        &self,
        character_id: CharacterId,
        owner_id: OwnerId,
        event: CharacterEvent,
    ) -> Result<EventId, PublishError>;
}
