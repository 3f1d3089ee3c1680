//! salescope API server entry point.
//!
//! Boots the HTTP server: loads configuration, opens the cache database,
//! sets up the retention index (non-fatal), wires the outbound clients and
//! serves the axum router.

use std::sync::Arc;

use anyhow::Result;
use salescope_client::{FetchConfig, OpenAiAnalyzer, PageScraper};
use salescope_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod analyze;
mod auth;
mod error;
mod housekeeping;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;

    tracing::info!(db_path = %config.db_path.display(), "starting salescope API server");

    if config.require_openai_api_key().is_err() {
        tracing::warn!("no OpenAI API key configured; analyses will fail at the extraction step");
    }

    let db = CacheDb::open(&config.db_path).await?;

    // Retention index failure must not block startup or serving.
    if let Err(e) = db.ensure_retention_index().await {
        tracing::warn!("could not create retention index, cache cleanup may degrade: {e}");
    }

    housekeeping::spawn(db.clone(), config.expiration_window(), housekeeping::SWEEP_INTERVAL);

    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.fetch_timeout(),
        ..Default::default()
    };
    let scraper = PageScraper::new(fetch_config, config.max_text_chars)?;
    let analyzer = OpenAiAnalyzer::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    );

    let jwt = auth::JwtService::new(&config.secret_key, config.token_expire_minutes);
    let state = state::AppState::new(db, Arc::new(scraper), Arc::new(analyzer), jwt, config.clone());

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
