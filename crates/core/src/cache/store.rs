//! Storage seam for the analyze workflow.
//!
//! The orchestrator talks to the cache through this trait so tests can
//! substitute fakes (including deliberately unreachable stores).

use super::connection::CacheDb;
use super::entries::CacheEntry;
use crate::Error;
use crate::insights::SalesInsights;
use async_trait::async_trait;

/// Point lookup, atomic upsert, and retention setup over the analysis cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Point read by derived key. Callers treat `Err` as a cache miss.
    async fn lookup(&self, hash: &str) -> Result<Option<CacheEntry>, Error>;

    /// Atomic insert-or-replace. Callers treat `Err` as "computed but not cached".
    async fn upsert(&self, hash: &str, url: &str, insights: &SalesInsights) -> Result<CacheEntry, Error>;

    /// Idempotent setup of the `updated_at` retention index.
    async fn ensure_retention_index(&self) -> Result<(), Error>;
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn lookup(&self, hash: &str) -> Result<Option<CacheEntry>, Error> {
        self.get_entry(hash).await
    }

    async fn upsert(&self, hash: &str, url: &str, insights: &SalesInsights) -> Result<CacheEntry, Error> {
        self.upsert_entry(hash, url, insights).await
    }

    async fn ensure_retention_index(&self) -> Result<(), Error> {
        CacheDb::ensure_retention_index(self).await
    }
}
