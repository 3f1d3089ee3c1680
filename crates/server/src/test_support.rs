//! Shared fixtures for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use salescope_client::{ContentFetcher, InsightExtractor};
use salescope_core::{AppConfig, CacheDb, Error, SalesInsights};

use crate::auth::{Claims, JwtService};
use crate::state::AppState;

pub struct StubFetcher;

#[async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        Err(Error::Fetch(url.to_string()))
    }
}

pub struct StubAnalyzer;

#[async_trait]
impl InsightExtractor for StubAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<serde_json::Value, Error> {
        Err(Error::Extraction("stub analyzer".to_string()))
    }
}

/// An application state over the given database, with stubbed collaborators.
pub fn state(db: CacheDb) -> AppState {
    let config = AppConfig::default();
    let jwt = JwtService::new(&config.secret_key, config.token_expire_minutes);
    AppState::new(db, Arc::new(StubFetcher), Arc::new(StubAnalyzer), jwt, config)
}

pub fn admin_claims() -> Claims {
    let now = chrono::Utc::now();
    Claims {
        sub: "vendas".to_string(),
        is_admin: true,
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
}

pub fn make_insights() -> SalesInsights {
    SalesInsights {
        nome_empresa: "Example Corp".to_string(),
        principal_servico_produto: "Widgets".to_string(),
        publico_alvo: "SMBs".to_string(),
        proposta_de_valor: "Cheaper widgets.".to_string(),
        pontos_de_venda_usp: vec!["Fast".into(), "Cheap".into(), "Reliable".into()],
        resumo_executivo: "A widget company.".to_string(),
    }
}
