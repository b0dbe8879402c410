//! Persistence layer for the event-booking backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The filesystem payment-artifact store

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod storage;

use domain::DomainError;

/// Map a sqlx failure into the domain taxonomy.
///
/// Row absence is a `NotFound` for the given resource; everything else is
/// a retryable `Storage` failure.
pub(crate) fn storage_error(resource: &'static str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::RowNotFound => DomainError::NotFound(resource),
        other => {
            tracing::error!(resource, error = %other, "database operation failed");
            DomainError::Storage(other.to_string())
        }
    }
}
