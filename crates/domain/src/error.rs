//! Domain error taxonomy.
//!
//! Every fallible core operation surfaces one of these variants; nothing is
//! swallowed. `Storage` is the only class a caller may retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A booking would push the event past its seat capacity.
    #[error("Insufficient seats: {available} available, {requested} requested")]
    CapacityExceeded { available: i64, requested: i64 },

    /// The confirmation token is unknown or was already redeemed.
    #[error("Link is invalid or already used")]
    InvalidOrUsedLink,

    #[error("Validation error: {0}")]
    Validation(String),

    /// Database or file storage unavailable or timed out. Retryable.
    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    /// Whether the caller may safely retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}
