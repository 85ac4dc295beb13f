//! End-to-end scenarios.
//!
//! Each test composes a full [`App`](crate::App) on SQLite `:memory:` stores,
//! the in-process cache and the in-process message bus, with a clock the test
//! moves by hand. No external services are needed.

mod e2e_helpers;
mod partial_write_tests;
mod saga_compensation_tests;

pub use e2e_helpers::*;
