//! Domain error to HTTP response mapping.
//!
//! Fetch failures are client-visible 400s; extraction and validation
//! failures are 500s. Cache errors never reach this mapping on the analyze
//! path (they are absorbed by the orchestrator) but map to 500 if they
//! surface anywhere else.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use salescope_core::Error;

/// Structured errors for the HTTP surface.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid credentials")]
    InvalidCredentials,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(Error::Fetch(_) | Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
