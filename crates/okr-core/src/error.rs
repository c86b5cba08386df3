// error.rs — Error taxonomy for the goal engine.
//
// Four categories, mirrored one-to-one onto the wire codes the API serves:
// VALIDATION_ERROR, NOT_FOUND, CONFLICT, INTERNAL_ERROR. Every engine
// operation fails with exactly one of these; there is no partial commit on
// failure.

use thiserror::Error;

/// Errors that can occur during goal engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input: empty title, missing required field, value out of
    /// range, too many key results.
    #[error("{message}")]
    Validation {
        /// The offending field, when the failure is attributable to one.
        field: Option<String>,
        message: String,
    },

    /// A referenced goal, key result, parent goal, template, or owner does
    /// not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// A state-machine or graph invariant would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Storage failure or other unexpected condition.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// A validation failure not tied to a specific field.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// A validation failure attributable to a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn not_found(what: &'static str, id: impl ToString) -> Self {
        EngineError::NotFound {
            what,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        EngineError::Internal(message.into())
    }

    /// The stable wire code for this error category.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_categories() {
        assert_eq!(EngineError::validation("x").code(), "VALIDATION_ERROR");
        assert_eq!(EngineError::not_found("goal", "abc").code(), "NOT_FOUND");
        assert_eq!(EngineError::conflict("x").code(), "CONFLICT");
        assert_eq!(EngineError::internal("x").code(), "INTERNAL_ERROR");
    }

    #[test]
    fn not_found_display_names_the_resource() {
        let err = EngineError::not_found("parent goal", "123");
        assert_eq!(err.to_string(), "parent goal not found: 123");
    }

    #[test]
    fn field_validation_carries_the_field() {
        let err = EngineError::field("title", "Title is required");
        match err {
            EngineError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("title")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
