//! Wire wrappers for published events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CharacterEvent;
use crate::ids::{CharacterId, EventId, OwnerId};

/// Schema version stamped on every envelope
pub const EVENT_SCHEMA_VERSION: &str = "1.0";

/// Subject prefix for undeliverable events
pub const DEAD_LETTER_PREFIX: &str = "character.dlq";

/// Dead-letter subject for an original subject, e.g. `character.dlq.character.created`.
pub fn dead_letter_subject(subject: &str) -> String {
    format!("{}.{}", DEAD_LETTER_PREFIX, subject)
}

/// A character event with its identity and routing metadata.
///
/// The payload fields are flattened next to the metadata so the wire shape is
/// a single flat JSON object carrying `event_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub character_id: CharacterId,
    pub owner_id: OwnerId,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    #[serde(flatten)]
    pub event: CharacterEvent,
}

impl EventEnvelope {
    pub fn new(
        event_id: EventId,
        character_id: CharacterId,
        owner_id: OwnerId,
        event: CharacterEvent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            character_id,
            owner_id,
            timestamp,
            version: EVENT_SCHEMA_VERSION.to_string(),
            event,
        }
    }

    pub fn subject(&self) -> &'static str {
        self.event.subject()
    }
}

/// An event that exhausted its delivery attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetter {
    pub original_subject: String,
    pub original_event: EventEnvelope,
    pub last_error: String,
    pub attempt_count: u32,
    pub timestamp: DateTime<Utc>,
}
