//! Cache entry CRUD operations.
//!
//! One row per derived URL hash, replaced wholesale on re-analysis. Freshness
//! is a computed property of `updated_at`; expired rows are left in place for
//! the retention sweep and simply read as absent by callers.

use super::connection::CacheDb;
use crate::Error;
use crate::insights::SalesInsights;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached analysis result for one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// SHA-256 of the original URL string (primary key).
    pub hash: String,
    /// Original input URL, stored verbatim.
    pub url: String,
    pub insights: SalesInsights,
    /// Set once, at first insertion. Preserved across refreshes.
    pub created_at: DateTime<Utc>,
    /// Bumped on every write.
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether this entry is still usable at `now` given the expiration window.
    pub fn is_fresh(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now < self.updated_at + window
    }
}

/// Aggregate counters over the cache, for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_analyses: i64,
    pub unique_urls: i64,
    pub last_analysis: Option<DateTime<Utc>>,
}

fn format_ts(ts: DateTime<Utc>) -> String {
    // Fixed-width UTC timestamps so lexical comparison in SQL agrees with
    // chronological order.
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(s: &str, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<CacheEntry, rusqlite::Error> {
    let insights_json: String = row.get(2)?;
    let insights: SalesInsights = serde_json::from_str(&insights_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(CacheEntry {
        hash: row.get(0)?,
        url: row.get(1)?,
        insights,
        created_at: parse_ts(&created_at, 3)?,
        updated_at: parse_ts(&updated_at, 4)?,
    })
}

const SELECT_COLS: &str = "hash, url, insights_json, created_at, updated_at";

impl CacheDb {
    /// Get a cache entry by hash.
    ///
    /// Returns None if the hash doesn't exist. Staleness is not checked here;
    /// callers apply [`CacheEntry::is_fresh`].
    pub async fn get_entry(&self, hash: &str) -> Result<Option<CacheEntry>, Error> {
        let hash = hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt =
                    conn.prepare(&format!("SELECT {SELECT_COLS} FROM web_cache WHERE hash = ?1"))?;

                let result = stmt.query_row(params![hash], row_to_entry);

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace the entry for a hash.
    ///
    /// Single atomic conditional write: inserts with `created_at =
    /// updated_at = now`, or replaces `url`, `insights` and `updated_at`
    /// while keeping the original `created_at`. Returns the stored row.
    pub async fn upsert_entry(&self, hash: &str, url: &str, insights: &SalesInsights) -> Result<CacheEntry, Error> {
        let hash = hash.to_string();
        let url = url.to_string();
        let insights_json =
            serde_json::to_string(insights).map_err(|e| Error::Validation(format!("unserializable insights: {e}")))?;
        let now = format_ts(Utc::now());

        self.conn
            .call(move |conn| -> Result<CacheEntry, Error> {
                conn.execute(
                    "INSERT INTO web_cache (hash, url, insights_json, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     ON CONFLICT(hash) DO UPDATE SET
                         url = excluded.url,
                         insights_json = excluded.insights_json,
                         updated_at = excluded.updated_at",
                    params![hash, url, insights_json, now],
                )?;

                let entry = conn.query_row(
                    &format!("SELECT {SELECT_COLS} FROM web_cache WHERE hash = ?1"),
                    params![hash],
                    row_to_entry,
                )?;
                Ok(entry)
            })
            .await
            .map_err(Error::from)
    }

    /// Idempotent setup of the retention index on `updated_at`.
    ///
    /// Failure is non-fatal to the system; callers log and continue.
    pub async fn ensure_retention_index(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                conn.execute(
                    "CREATE INDEX IF NOT EXISTS idx_web_cache_updated_at ON web_cache (updated_at)",
                    [],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// All cache entries, newest first.
    pub async fn list_entries(&self) -> Result<Vec<CacheEntry>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<CacheEntry>, Error> {
                let mut stmt =
                    conn.prepare(&format!("SELECT {SELECT_COLS} FROM web_cache ORDER BY updated_at DESC"))?;
                let rows = stmt.query_map([], row_to_entry)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
            .await
            .map_err(Error::from)
    }

    /// The `limit` most recently updated entries.
    pub async fn recent_entries(&self, limit: usize) -> Result<Vec<CacheEntry>, Error> {
        // A wrapped-negative LIMIT would read as unbounded in SQLite.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<Vec<CacheEntry>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SELECT_COLS} FROM web_cache ORDER BY updated_at DESC LIMIT ?1"
                ))?;
                let rows = stmt.query_map(params![limit], row_to_entry)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
            .await
            .map_err(Error::from)
    }

    /// Aggregate counters for the admin stats endpoint.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        self.conn
            .call(|conn| -> Result<CacheStats, Error> {
                let (total, unique): (i64, i64) = conn.query_row(
                    "SELECT COUNT(*), COUNT(DISTINCT url) FROM web_cache",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;

                let last: Option<String> =
                    conn.query_row("SELECT MAX(updated_at) FROM web_cache", [], |row| row.get(0))?;
                let last_analysis = match last {
                    Some(s) => Some(parse_ts(&s, 0)?),
                    None => None,
                };

                Ok(CacheStats { total_analyses: total, unique_urls: unique, last_analysis })
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries older than the expiration window (storage hygiene only;
    /// read-path correctness never depends on this running).
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self, window: Duration) -> Result<u64, Error> {
        let cutoff = format_ts(Utc::now() - window);
        let deleted = self
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM web_cache WHERE updated_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)?;

        if deleted > 0 {
            tracing::debug!("purged {deleted} expired cache entries");
        }

        Ok(deleted)
    }
}
