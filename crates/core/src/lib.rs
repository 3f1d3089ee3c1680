//! Core types and shared functionality for salescope.
//!
//! This crate provides:
//! - SQLite-backed web analysis cache
//! - The sales insights data model
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod insights;

pub use cache::{CacheDb, CacheEntry, CacheStore};
pub use config::AppConfig;
pub use error::Error;
pub use insights::SalesInsights;
