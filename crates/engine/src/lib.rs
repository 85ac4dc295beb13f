//! Roster engine library.
//!
//! Server-side code for the character roster service.
//!
//! ## Structure
//!
//! - `infrastructure/` - Port traits and their adapters (SQLite, cache, message bus)
//! - `use_cases/` - Character operations and the creation saga
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end scenarios against SQLite, the in-process cache and bus.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
