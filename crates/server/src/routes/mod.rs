//! HTTP routes.

pub mod admin;
pub mod auth;
pub mod scrape;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/scrape", post(scrape::scrape))
        .route("/api/v1/admin/cached_data", get(admin::cached_data))
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/recent-analyses", get(admin::recent_analyses))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the salescope API",
        "status": "running"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
