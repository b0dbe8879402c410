//! Authentication middleware.
//!
//! Every event- and booking-management route requires a valid bearer
//! token; the core treats the check as a yes/no gate evaluated before the
//! operation runs.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Verified operator identity stored in request extensions.
#[derive(Debug, Clone)]
pub struct OperatorAuth {
    pub username: String,
}

/// Middleware that requires a valid `Authorization: Bearer` token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized("Missing bearer token".into()).into_response();
        }
    };

    match state.jwt.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(OperatorAuth {
                username: claims.sub,
            });
            next.run(req).await
        }
        Err(shared::jwt::JwtError::TokenExpired) => {
            ApiError::Unauthorized("Token expired".into()).into_response()
        }
        Err(_) => ApiError::Unauthorized("Invalid bearer token".into()).into_response(),
    }
}
