//! Domain error model.

use thiserror::Error;

/// Result type used across the domain and store layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// uniqueness, referential protection). Transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed validation: blank/overlong value, duplicate, unknown
    /// reference id, or a cross-field rule. Always scoped to one field.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A requested row was not found.
    #[error("not found")]
    NotFound,

    /// Delete refused because other rows still reference the target.
    #[error("{0}")]
    Protected(String),

    /// Store-level failure outside the domain taxonomy.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn protected(msg: impl Into<String>) -> Self {
        Self::Protected(msg.into())
    }

    /// The offending field for validation errors, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
