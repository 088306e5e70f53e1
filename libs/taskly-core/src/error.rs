//! Error types for the Taskly core library

use thiserror::Error;

/// Result type alias for Taskly operations
pub type Result<T> = std::result::Result<T, TasklyError>;

/// Main error type for Taskly operations
#[derive(Error, Debug)]
pub enum TasklyError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown field for {entity}: {field}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TasklyError {
    /// Create a not-found error for an entity
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unknown-field error
    pub fn unknown_field(entity: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity,
            field: field.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Convert a driver error into the domain taxonomy.
    ///
    /// Constraint violations (uniqueness, foreign keys, CHECK, NOT NULL)
    /// become `Conflict`; everything else stays a `Database` error tagged
    /// with the operation context.
    #[must_use]
    pub fn store(context: &str, error: &sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = error {
            let kind = db_err.kind();
            if matches!(
                kind,
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ) {
                return Self::Conflict {
                    message: format!("{context}: {}", db_err.message()),
                };
            }
        }
        Self::Database(format!("{context}: {error}"))
    }
}
