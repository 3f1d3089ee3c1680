//! POST /api/v1/auth/login handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Validate credentials and issue an access token.
pub async fn login(
    State(state): State<AppState>, Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if request.username != state.config.admin_username || request.password != state.config.admin_password {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .jwt
        .create_token(&request.username, true)
        .map_err(|e| ApiError::Unauthorized(format!("could not issue token: {e}")))?;

    Ok(Json(TokenResponse { access_token: token, token_type: "bearer" }))
}
