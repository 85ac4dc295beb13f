//! Roster domain - character identity, appearance, stats and position
//!
//! Pure types and rules. No I/O, no async; every time-dependent operation
//! takes `now` from the caller.

extern crate self as roster_domain;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Character, LevelProgress};
pub use entities::{Appearance, AppearancePatch, Position, PositionPatch, Stats};
pub use error::DomainError;
pub use events::{CharacterEvent, DeadLetter, EventEnvelope};
pub use ids::{CharacterId, EventId, InstanceId, OwnerId};
