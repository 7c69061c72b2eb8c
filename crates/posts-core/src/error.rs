//! Domain-level error types.

use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self::new(field, "must not be blank")
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "must be provided")
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {key}")]
    NotFound { entity_type: &'static str, key: String },

    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Persistence(#[from] RepoError),
}

impl DomainError {
    pub fn post_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Post",
            key: key.to_string(),
        }
    }
}

fn describe(violations: &[FieldError]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
