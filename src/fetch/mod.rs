//! Fetch layer: one client per external data source, normalized into a bundle
//!
//! This module turns a software name into a [`outcome::Bundle`] of per-source
//! results by querying several public web APIs concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│ Aggregator  │────▶│   Bundle    │
//! │ (name→src)  │     │ (fan-out)   │     │ (outcomes)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Sources   │
//! │ (eol, npm,…)│
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: the `Source` trait every fetcher implements
//! - [`sources`]: concrete fetchers (endoflife.date, GitHub, npm, …)
//! - [`registry`]: ordered name→source mapping driving the bundle layout
//! - [`aggregator`]: concurrent fan-out/fan-in with a per-fetch deadline
//! - [`outcome`]: `FetchOutcome` and the aggregated `Bundle`
//! - [`types`]: normalized record types shared across sources
//! - [`error`]: error types for fetch and lookup operations

pub mod aggregator;
pub mod error;
pub mod outcome;
pub mod registry;
pub mod source;
pub mod sources;
pub mod types;

use std::time::Duration;

use crate::config::{FETCH_TIMEOUT_SECS, USER_AGENT};

/// Builds the HTTP client used by every source: shared user agent and a
/// fire-once request timeout, no retries.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}
