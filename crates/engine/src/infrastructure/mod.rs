//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod background;
pub mod cache;
pub mod character_cache;
pub mod clock;
pub mod config;
pub mod event_publisher;
pub mod message_bus;
pub mod ports;
pub mod sqlite;
