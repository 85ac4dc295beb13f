//! Unified error types for the domain layer
//!
//! Domain operations return `DomainError` so that adapters and use cases can
//! map failures without resorting to strings or `anyhow`.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Stat allocation attempted with an empty point pool
    #[error("No stat points available")]
    NoStatPointsAvailable,

    /// Character is not deleted, or its restore window has closed
    #[error("Character cannot be restored")]
    CannotBeRestored,
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Values are outside allowed ranges
    /// - Strings do not match the allowed character set
    ///
    /// # Example
    /// ```ignore
    /// if !(FACE_TYPE_MIN..=FACE_TYPE_MAX).contains(&face_type) {
    ///     return Err(DomainError::validation("Invalid face type"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("invalid face type");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: invalid face type");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown class: bard");
        assert!(matches!(err, DomainError::Parse(_)));
        assert!(err.to_string().contains("bard"));
    }

    #[test]
    fn test_unit_errors_display() {
        assert_eq!(
            DomainError::NoStatPointsAvailable.to_string(),
            "No stat points available"
        );
        assert_eq!(
            DomainError::CannotBeRestored.to_string(),
            "Character cannot be restored"
        );
    }
}
