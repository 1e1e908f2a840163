//! Source trait implemented by every fetcher

#[cfg(test)]
use mockall::automock;

use crate::fetch::error::SourceError;
use crate::fetch::types::{SourceData, SourceKind};

/// A single-source data fetcher: one outbound request per call, reshaped
/// into a normalized payload.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Which external source this fetcher talks to
    fn kind(&self) -> SourceKind;

    /// Fetches and normalizes data for a software name
    ///
    /// # Returns
    /// * `Ok(Some(data))` - upstream had matching data
    /// * `Ok(None)` - upstream answered but had nothing (including 404)
    /// * `Err(SourceError)` - transport fault, rate limit, or bad payload
    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError>;
}
