//! Error types for the catalog core
//!
//! All fallible operations return [`Result<T>`] with [`CatalogError`].
//! The four caller-facing kinds map onto the workflow contract:
//!
//! - [`CatalogError::Validation`]: field-level failures, nothing written
//! - [`CatalogError::NotFound`]: a referenced entity id does not exist
//! - [`CatalogError::Unauthorized`]: mutation attempted without an identity
//! - [`CatalogError::ConstraintViolation`]: the store's uniqueness or
//!   foreign-key guard fired; unreachable when application logic is correct,
//!   but always surfaced as a result, never a panic
//!
//! Everything else (pool exhaustion, timeouts, I/O) collapses into the
//! infrastructure variants below.

use crate::validation::FieldError;
use thiserror::Error;

/// Result type alias using our CatalogError type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for the catalog core
#[derive(Error, Debug)]
pub enum CatalogError {
    /// One or more field-level validation rules failed. No mutation occurred.
    #[error("validation failed with {} errors", .errors.len())]
    Validation {
        /// Individual (field, message) failures
        errors: Vec<FieldError>,
    },

    /// A referenced entity id does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Mutation attempted without an authenticated identity
    #[error("authentication required")]
    Unauthorized,

    /// Store-level uniqueness or foreign-key failure
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Generic database error (connection, timeout, malformed query)
    #[error("database error: {0}")]
    Database(String),

    /// Database schema migration failed
    #[error("database migration failed: {0}")]
    MigrationFailed(String),

    /// Media store I/O error
    #[error("file I/O error: {0}")]
    FileIo(String),

    /// Invalid caller-supplied input outside the field-validation rules
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

// Unique/FK violations get their own variant so workflows can surface them
// as a recoverable failure result instead of a generic database error.
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() || db.is_foreign_key_violation() {
                return CatalogError::ConstraintViolation(db.message().to_string());
            }
        }
        CatalogError::Database(err.to_string())
    }
}

impl CatalogError {
    /// Create a NotFound error for an entity id
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    /// Create a Validation error from collected field failures
    pub fn validation(errors: Vec<FieldError>) -> Self {
        CatalogError::Validation { errors }
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        CatalogError::InvalidInput(message.into())
    }

    /// Check if this error is a recoverable user error
    ///
    /// Returns `true` for errors the rendering collaborator shows back to the
    /// user (bad input, missing entity, missing login) as opposed to
    /// infrastructure failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation { .. }
                | CatalogError::NotFound { .. }
                | CatalogError::Unauthorized
                | CatalogError::InvalidInput(_)
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Validation { errors } => {
                let list = errors
                    .iter()
                    .map(|e| format!("  - {}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Please correct the following fields:\n{list}")
            }
            CatalogError::NotFound { entity, .. } => {
                format!("The requested {entity} does not exist.")
            }
            CatalogError::Unauthorized => "Please log in to perform this action.".to_string(),
            CatalogError::ConstraintViolation(_) => {
                "The change conflicts with existing catalog data. Please reload and try again."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_counts_fields() {
        let err = CatalogError::validation(vec![
            FieldError::new("title", "title too short"),
            FieldError::new("pages", "negative page count"),
        ]);
        assert_eq!(err.to_string(), "validation failed with 2 errors");
        assert!(err.is_user_error());
        assert!(err.user_message().contains("title too short"));
    }

    #[test]
    fn not_found_is_user_error() {
        let err = CatalogError::not_found("book", 42);
        assert_eq!(err.to_string(), "book not found: 42");
        assert!(err.is_user_error());
    }

    #[test]
    fn constraint_violation_is_not_user_error() {
        let err = CatalogError::ConstraintViolation("UNIQUE constraint failed".to_string());
        assert!(!err.is_user_error());
        assert!(err.user_message().contains("conflicts"));
    }
}
