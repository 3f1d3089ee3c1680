//! Shared application state.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use salescope_client::{ContentFetcher, InsightExtractor};
use salescope_core::{AppConfig, CacheDb};

use crate::auth::JwtService;

/// Process-local cache hit/miss counters for the admin stats endpoint.
/// Reset on restart.
#[derive(Debug, Default)]
pub struct HitCounters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: CacheDb,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub analyzer: Arc<dyn InsightExtractor>,
    pub jwt: JwtService,
    pub config: Arc<AppConfig>,
    pub counters: Arc<HitCounters>,
}

impl AppState {
    pub fn new(
        db: CacheDb, fetcher: Arc<dyn ContentFetcher>, analyzer: Arc<dyn InsightExtractor>, jwt: JwtService,
        config: AppConfig,
    ) -> Self {
        Self {
            db,
            fetcher,
            analyzer,
            jwt,
            config: Arc::new(config),
            counters: Arc::new(HitCounters::default()),
        }
    }
}
