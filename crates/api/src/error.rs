use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The reservation would push the event past its seat capacity.
    #[error("Capacity exceeded: {available} seats available")]
    CapacityExceeded { available: i64 },

    /// Confirmation token unknown or already redeemed.
    #[error("Link is invalid or already used")]
    InvalidOrUsedLink,

    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying store unavailable or timed out. Retryable by the caller.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::CapacityExceeded { .. } => {
                (StatusCode::CONFLICT, "capacity_exceeded", self.to_string())
            }
            ApiError::InvalidOrUsedLink => (
                StatusCode::NOT_FOUND,
                "invalid_or_used_link",
                self.to_string(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(resource) => ApiError::NotFound(format!("{} not found", resource)),
            DomainError::CapacityExceeded { available, .. } => {
                ApiError::CapacityExceeded { available }
            }
            DomainError::InvalidOrUsedLink => ApiError::InvalidOrUsedLink,
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Storage(msg) => ApiError::ServiceUnavailable(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e.message.clone().map(|m| m.to_string()).unwrap_or_default();
                    format!("{}: {}", field, message)
                })
            })
            .collect();

        ApiError::Validation(details.join("; "))
    }
}
