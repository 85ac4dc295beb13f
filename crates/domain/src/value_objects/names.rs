//! Validated character names
//!
//! Names are checked against a [`NamePolicy`] at creation time only. Stored
//! names are trusted on the way back in, so tightening the policy later never
//! makes existing rows unreadable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Default minimum name length
pub const DEFAULT_NAME_MIN_LENGTH: usize = 3;

/// Default maximum name length
pub const DEFAULT_NAME_MAX_LENGTH: usize = 30;

/// Fragments that may not appear anywhere in a name, compared case-insensitively
const RESERVED_FRAGMENTS: &[&str] = &["admin", "gm", "gamemaster", "moderator"];

/// Length bounds applied when a player picks a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_NAME_MIN_LENGTH,
            max_length: DEFAULT_NAME_MAX_LENGTH,
        }
    }
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name.
///
/// Uniqueness is case-insensitive; use [`CharacterName::lookup_key`] when
/// comparing or indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterName(String);

impl CharacterName {
    /// Validate a player-supplied name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The length is outside the policy bounds
    /// - The name contains anything besides ASCII letters, digits, spaces and hyphens
    /// - The name starts or ends with a space
    /// - The name contains a reserved fragment
    pub fn parse(raw: &str, policy: &NamePolicy) -> Result<Self, DomainError> {
        let length = raw.chars().count();
        if length < policy.min_length || length > policy.max_length {
            return Err(DomainError::validation(format!(
                "Character name must be between {} and {} characters",
                policy.min_length, policy.max_length
            )));
        }

        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
        {
            return Err(DomainError::validation(
                "Character name may only contain letters, digits, spaces and hyphens",
            ));
        }

        if raw.starts_with(' ') || raw.ends_with(' ') {
            return Err(DomainError::validation(
                "Character name cannot start or end with a space",
            ));
        }

        let lowered = raw.to_ascii_lowercase();
        if RESERVED_FRAGMENTS
            .iter()
            .any(|fragment| lowered.contains(fragment))
        {
            return Err(DomainError::validation(
                "Character name contains a reserved word",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for uniqueness checks and lookups.
    pub fn lookup_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}
