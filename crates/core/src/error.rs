//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic, caller-visible domain failure.
///
/// Storage and transport failures never appear here; services surface those
/// through `anyhow` at the composition edges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation (blank name, malformed payload field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced record does not exist (missing plan, unregistered
    /// account, unknown app entry).
    #[error("not found")]
    NotFound,

    /// The request contradicts current state (duplicate registration,
    /// cancel of an already-canceled subscription).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller may not perform this operation.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
