//! POST /api/v1/scrape handler.

use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::State;

use crate::analyze::{ScrapeRequest, ScrapeResponse, analyze_url};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Check the cache, scrape and analyze on a miss, and answer with insights.
pub async fn scrape(
    State(state): State<AppState>, _user: AuthUser, Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let response = analyze_url(
        &state.db,
        state.fetcher.as_ref(),
        state.analyzer.as_ref(),
        state.config.expiration_window(),
        &request.url,
    )
    .await?;

    if response.is_cached {
        state.counters.hits.fetch_add(1, Ordering::Relaxed);
    } else {
        state.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    Ok(Json(response))
}
