//! Use cases - User story orchestration.
//!
//! Use cases sequence store writes, cache invalidation and event publication.
//! They depend only on port traits.

pub mod character;

pub use character::CharacterUseCases;
