//! Error types for port operations.

/// Constraint message for a name held by another active character.
pub const NAME_TAKEN: &str = "name already taken";

/// Constraint message for an owner slot held by an active character.
pub const SLOT_OCCUPIED: &str = "slot already occupied";

/// Repository operation errors with context for debugging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepoError {
    /// Record not found - includes record kind and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Store unreachable or the statement failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A uniqueness rule rejected the write (name, slot, or duplicate key).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with record kind and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

/// Key-value cache failures. Callers treat these as misses.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("Cache error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }
}

/// Message bus transport failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BusError {
    #[error("Publish to {subject} failed: {message}")]
    Publish { subject: String, message: String },

    #[error("Stream {stream} setup failed: {message}")]
    Stream { stream: String, message: String },
}

/// Event publication failures surfaced by the publisher.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to encode {subject} event: {message}")]
    Encode {
        subject: &'static str,
        message: String,
    },

    #[error("Failed to publish {subject} after {attempts} attempts: {last_error}")]
    Exhausted {
        subject: &'static str,
        attempts: u32,
        last_error: BusError,
        dead_lettered: bool,
    },
}
