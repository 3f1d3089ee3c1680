//! Admin endpoints: read-only views over the cache store.
//!
//! These never propagate failures: any storage error degrades to a
//! zero-valued payload with an embedded `error` string.

use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use salescope_core::cache::CacheEntry;

use crate::auth::AdminUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CachedDataResponse {
    pub entries: Vec<CacheEntry>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/admin/cached_data
pub async fn cached_data(State(state): State<AppState>, _admin: AdminUser) -> Json<CachedDataResponse> {
    match state.db.list_entries().await {
        Ok(entries) => {
            let count = entries.len();
            Json(CachedDataResponse { entries, count, error: None })
        }
        Err(e) => Json(CachedDataResponse { entries: Vec::new(), count: 0, error: Some(e.to_string()) }),
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_analyses: i64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub unique_urls: i64,
    pub last_analysis: Option<chrono::DateTime<chrono::Utc>>,
    pub cache_efficiency: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/admin/stats
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> Json<StatsResponse> {
    let hits = state.counters.hits.load(Ordering::Relaxed);
    let misses = state.counters.misses.load(Ordering::Relaxed);
    let served = hits + misses;
    let efficiency = if served > 0 {
        format!("{:.1}%", hits as f64 / served as f64 * 100.0)
    } else {
        "0.0%".to_string()
    };
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.db.stats().await {
        Ok(s) => Json(StatsResponse {
            total_analyses: s.total_analyses,
            cache_hits: hits,
            cache_misses: misses,
            unique_urls: s.unique_urls,
            last_analysis: s.last_analysis,
            cache_efficiency: efficiency,
            timestamp,
            error: None,
        }),
        Err(e) => Json(StatsResponse {
            total_analyses: 0,
            cache_hits: 0,
            cache_misses: 0,
            unique_urls: 0,
            last_analysis: None,
            cache_efficiency: "0.0%".to_string(),
            timestamp,
            error: Some(e.to_string()),
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct RecentAnalysesResponse {
    pub analyses: Vec<CacheEntry>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/v1/admin/recent-analyses
pub async fn recent_analyses(
    State(state): State<AppState>, _admin: AdminUser, Query(query): Query<RecentQuery>,
) -> Json<RecentAnalysesResponse> {
    match state.db.recent_entries(query.limit).await {
        Ok(analyses) => {
            let count = analyses.len();
            Json(RecentAnalysesResponse { analyses, count, error: None })
        }
        Err(e) => Json(RecentAnalysesResponse { analyses: Vec::new(), count: 0, error: Some(e.to_string()) }),
    }
}
