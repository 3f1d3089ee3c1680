//! Background storage hygiene.
//!
//! Periodically deletes cache rows that aged past the expiration window.
//! Read-path correctness never depends on this running: freshness is computed
//! on read, the sweep only reclaims storage.

use std::time::Duration;

use salescope_core::CacheDb;

/// How often the retention sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Run one retention sweep. Failures are logged, never propagated.
pub async fn sweep(db: &CacheDb, window: chrono::Duration) {
    match db.purge_expired(window).await {
        Ok(deleted) if deleted > 0 => tracing::info!("retention sweep removed {deleted} expired entries"),
        Ok(_) => {}
        Err(e) => tracing::warn!("retention sweep failed: {e}"),
    }
}

/// Spawn the periodic retention sweep task.
pub fn spawn(db: CacheDb, window: chrono::Duration, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep(&db, window).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use salescope_core::cache::hash::compute_cache_key;

    #[tokio::test]
    async fn test_sweep_deletes_aged_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let url = "https://example.com";
        let hash = compute_cache_key(url);
        db.upsert_entry(&hash, url, &crate::test_support::make_insights())
            .await
            .unwrap();

        // A seven day window keeps the fresh row.
        sweep(&db, chrono::Duration::days(7)).await;
        assert!(db.get_entry(&hash).await.unwrap().is_some());

        // A zero window ages everything out.
        sweep(&db, chrono::Duration::zero()).await;
        assert!(db.get_entry(&hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_swallows_storage_failure() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.clone().close().await.unwrap();

        // Must not panic or propagate.
        sweep(&db, chrono::Duration::days(7)).await;
    }
}
