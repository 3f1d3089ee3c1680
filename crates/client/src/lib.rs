//! Outbound collaborators for salescope.
//!
//! This crate provides the two external calls the analyze workflow depends
//! on: fetching a page and reducing it to text, and sending that text to an
//! AI provider for insight extraction. Both are exposed behind traits so the
//! orchestrator can run against fakes.

pub mod analyzer;
pub mod extract;
pub mod fetch;
pub mod scrape;

pub use analyzer::{InsightExtractor, OpenAiAnalyzer};
pub use extract::html_to_text;
pub use fetch::{FetchClient, FetchConfig};
pub use scrape::{ContentFetcher, PageScraper};
