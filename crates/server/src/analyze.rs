//! The analyze-URL workflow.
//!
//! Linear state machine with no back-edges:
//! cache check -> fetch -> extract -> validate -> persist -> respond.
//!
//! Only fetch/extract/validate failures abort the workflow. Cache reads that
//! fail are treated as misses; a failed persist still answers the caller with
//! the computed insights (degraded, uncached). There is no per-key in-flight
//! lock: concurrent misses on the same URL may both recompute, and the last
//! atomic upsert wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salescope_client::{ContentFetcher, InsightExtractor};
use salescope_core::cache::hash::compute_cache_key;
use salescope_core::{CacheStore, Error, SalesInsights};

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResponse {
    pub url: String,
    pub is_cached: bool,
    pub insights: SalesInsights,
    pub cached_at: DateTime<Utc>,
}

/// Run the full analyze workflow for one URL.
pub async fn analyze_url(
    store: &dyn CacheStore, fetcher: &dyn ContentFetcher, analyzer: &dyn InsightExtractor, window: chrono::Duration,
    url: &str,
) -> Result<ScrapeResponse, Error> {
    if url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()));
    }

    let hash = compute_cache_key(url);

    // Cache check. A storage error here must never fail the request.
    match store.lookup(&hash).await {
        Ok(Some(entry)) if entry.is_fresh(window, Utc::now()) => {
            tracing::debug!("cache hit for {url}");
            return Ok(ScrapeResponse {
                url: url.to_string(),
                is_cached: true,
                insights: entry.insights,
                cached_at: entry.updated_at,
            });
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("cache lookup failed for {url}, recomputing: {e}");
        }
    }

    // Fetch. Empty page text is a fetch failure naming the URL.
    let text = fetcher.fetch_text(url).await?;
    if text.trim().is_empty() {
        return Err(Error::Fetch(url.to_string()));
    }

    // Extract, then coerce the raw AI payload into the strict shape.
    let raw = analyzer.analyze(&text).await?;
    let insights = SalesInsights::from_ai_json(raw)?;

    // Persist. A cache-write failure never turns a successful analysis
    // into an error.
    let cached_at = match store.upsert(&hash, url, &insights).await {
        Ok(entry) => entry.updated_at,
        Err(e) => {
            tracing::warn!("cache write failed for {url}, returning uncached result: {e}");
            Utc::now()
        }
    };

    Ok(ScrapeResponse { url: url.to_string(), is_cached: false, insights, cached_at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use salescope_core::cache::CacheEntry;
    use salescope_core::{CacheDb, Error};
    use serde_json::json;

    const EXAMPLE_TEXT: &str = "Example Domain. This domain is for illustrative examples.";

    struct FakeFetcher {
        text: String,
    }

    #[async_trait]
    impl ContentFetcher for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, Error> {
            if self.text.is_empty() {
                return Err(Error::Fetch(url.to_string()));
            }
            Ok(self.text.clone())
        }
    }

    struct FakeAnalyzer {
        payload: serde_json::Value,
    }

    #[async_trait]
    impl InsightExtractor for FakeAnalyzer {
        async fn analyze(&self, _text: &str) -> Result<serde_json::Value, Error> {
            if let Some(err) = self.payload.get("__fail") {
                return Err(Error::Extraction(err.as_str().unwrap_or("boom").to_string()));
            }
            Ok(self.payload.clone())
        }
    }

    /// A store whose connectivity is permanently broken.
    struct UnreachableStore;

    #[async_trait]
    impl CacheStore for UnreachableStore {
        async fn lookup(&self, _hash: &str) -> Result<Option<CacheEntry>, Error> {
            Err(Error::CacheUnavailable(tokio_rusqlite::Error::ConnectionClosed))
        }

        async fn upsert(&self, _hash: &str, _url: &str, _insights: &SalesInsights) -> Result<CacheEntry, Error> {
            Err(Error::CacheUnavailable(tokio_rusqlite::Error::ConnectionClosed))
        }

        async fn ensure_retention_index(&self) -> Result<(), Error> {
            Err(Error::CacheUnavailable(tokio_rusqlite::Error::ConnectionClosed))
        }
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "nome_empresa": "Example Corp",
            "principal_servico_produto": "Illustrative domains",
            "publico_alvo": "Documentation authors",
            "proposta_de_valor": "A reserved domain for examples.",
            "pontos_de_venda_usp": ["Stable", "Well known", "Free to reference"],
            "resumo_executivo": "Example.com is a reserved illustration domain."
        })
    }

    fn window() -> chrono::Duration {
        chrono::Duration::days(7)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let analyzer = FakeAnalyzer { payload: full_payload() };
        let url = "https://example.com";

        let first = analyze_url(&db, &fetcher, &analyzer, window(), url).await.unwrap();
        assert!(!first.is_cached);
        assert_eq!(first.insights.nome_empresa, "Example Corp");

        let second = analyze_url(&db, &fetcher, &analyzer, window(), url).await.unwrap();
        assert!(second.is_cached);
        assert_eq!(second.insights, first.insights);
        assert_eq!(second.cached_at, first.cached_at);
    }

    #[tokio::test]
    async fn test_empty_fetch_aborts_without_writing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: String::new() };
        let analyzer = FakeAnalyzer { payload: full_payload() };
        let url = "https://example.com";

        let result = analyze_url(&db, &fetcher, &analyzer, window(), url).await;
        assert!(matches!(result, Err(Error::Fetch(ref u)) if u.contains(url)));

        let entry = db.get_entry(&compute_cache_key(url)).await.unwrap();
        assert!(entry.is_none(), "no cache entry may be written on fetch failure");
    }

    #[tokio::test]
    async fn test_unreachable_store_still_succeeds() {
        let store = UnreachableStore;
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let analyzer = FakeAnalyzer { payload: full_payload() };

        let response = analyze_url(&store, &fetcher, &analyzer, window(), "https://example.com")
            .await
            .unwrap();
        assert!(!response.is_cached);
        assert_eq!(response.insights.nome_empresa, "Example Corp");
    }

    #[tokio::test]
    async fn test_extraction_error_surfaces() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let analyzer = FakeAnalyzer { payload: json!({"__fail": "provider down"}) };

        let result = analyze_url(&db, &fetcher, &analyzer, window(), "https://example.com").await;
        assert!(matches!(result, Err(Error::Extraction(ref msg)) if msg.contains("provider down")));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_validation_error() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let analyzer = FakeAnalyzer { payload: json!({"pontos_de_venda_usp": 42}) };

        let result = analyze_url(&db, &fetcher, &analyzer, window(), "https://example.com").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_partial_payload_gets_sentinel_and_is_stored() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("resumo_executivo");
        let analyzer = FakeAnalyzer { payload };
        let url = "https://example.com";

        let response = analyze_url(&db, &fetcher, &analyzer, window(), url).await.unwrap();
        assert_eq!(response.insights.resumo_executivo, salescope_core::insights::SENTINEL);

        let stored = db.get_entry(&compute_cache_key(url)).await.unwrap().unwrap();
        assert_eq!(stored.insights.resumo_executivo, salescope_core::insights::SENTINEL);
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let fetcher = FakeFetcher { text: EXAMPLE_TEXT.to_string() };
        let analyzer = FakeAnalyzer { payload: full_payload() };

        let result = analyze_url(&db, &fetcher, &analyzer, window(), "  ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
