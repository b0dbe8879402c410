//! Operator login endpoint issuing bearer tokens.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange the operator credential for a bearer token.
///
/// POST /api/auth/token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let auth = &state.config.auth;

    // Verify the password even for an unknown username so both failure
    // modes take comparable time.
    let password_ok =
        shared::password::verify_password(&request.password, &auth.operator_password_hash)
            .unwrap_or(false);

    if request.username != auth.operator_username || !password_ok {
        tracing::warn!(username = %request.username, "failed operator login");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let access_token = state
        .jwt
        .issue(&request.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(username = %request.username, "operator logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
