//! Character events and their wire envelopes

pub mod character_events;
pub mod envelope;

pub use character_events::*;
pub use envelope::{dead_letter_subject, DeadLetter, EventEnvelope, DEAD_LETTER_PREFIX, EVENT_SCHEMA_VERSION};
