//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, not-found) plus the two storage outcomes callers must react to
/// (`Conflict` is retryable, `WriteFailure` is not).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. malformed input, rejected field shape).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Stock adjustment would drive inventory below zero.
    #[error("insufficient inventory: {available} available, {requested} requested")]
    InsufficientInventory { available: i64, requested: i64 },

    /// An identifier was invalid (e.g. empty document key).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced document was not found.
    #[error("not found")]
    NotFound,

    /// The store aborted a transaction due to a concurrent write.
    /// Callers choose their own retry policy; the core never auto-retries.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// A non-transactional append failed. Nothing to roll back.
    #[error("write failed: {0}")]
    WriteFailure(String),

    /// Payload could not be (de)serialized to the document shape.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_inventory(available: i64, requested: i64) -> Self {
        Self::InsufficientInventory {
            available,
            requested,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn write_failure(msg: impl Into<String>) -> Self {
        Self::WriteFailure(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Whether the failure is worth retrying (only store conflicts are).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
