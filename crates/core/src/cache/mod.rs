//! SQLite-backed cache for web analysis results.
//!
//! This module provides a persistent cache keyed by the SHA-256 hash of the
//! analyzed URL, with async access via tokio-rusqlite. It supports:
//!
//! - Deterministic key derivation from URL strings
//! - Atomic insert-or-replace per key
//! - Computed freshness (expired rows read as absent, no deletion required)
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{CacheEntry, CacheStats};
pub use store::CacheStore;
