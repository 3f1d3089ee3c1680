//! Unified error types for salescope.
//!
//! Only the fetch/extraction/validation variants ever abort the analyze
//! workflow; cache errors are absorbed by the callers (read path falls back
//! to recomputation, write path degrades to "computed but not cached").

use tokio_rusqlite::rusqlite;

/// Unified error types for the salescope service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page content could not be retrieved or came back empty. Carries the URL.
    #[error("FETCH_FAILED: could not scrape content from {0}")]
    Fetch(String),

    /// The AI provider call failed or was misconfigured.
    #[error("EXTRACTION_FAILED: {0}")]
    Extraction(String),

    /// AI output could not be coerced into the insights shape.
    #[error("VALIDATION_FAILED: {0}")]
    Validation(String),

    /// Database operation failed. Never surfaced to API callers as a hard error.
    #[error("CACHE_UNAVAILABLE: {0}")]
    CacheUnavailable(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_UNAVAILABLE: migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::CacheUnavailable(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::CacheUnavailable(tokio_rusqlite::Error::Close(c)),
            _ => Error::CacheUnavailable(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::CacheUnavailable(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::CacheUnavailable(tokio_rusqlite::Error::Error(err))
    }
}
