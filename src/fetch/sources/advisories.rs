//! Security-advisory search client
//!
//! Reuses GitHub repository search with an advisory-flavored query, the way
//! the original tool surfaced security signals.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ADVISORY_LIMIT;
use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::{format_date, status_error};
use crate::fetch::types::{AdvisoryRecord, SourceData, SourceKind, NO_ADVISORY_DESCRIPTION};

/// Default base URL for the GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<AdvisoryItem>,
}

#[derive(Debug, Deserialize)]
struct AdvisoryItem {
    name: String,
    description: Option<String>,
    #[serde(default)]
    updated_at: String,
    html_url: String,
}

pub struct AdvisorySource {
    client: reqwest::Client,
    base_url: String,
}

impl AdvisorySource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for AdvisorySource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for AdvisorySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Advisories
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/search/repositories", self.base_url);
        let query = format!("{software} security advisory");
        debug!("Searching advisories: {} q={}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("sort", "updated"),
                ("order", "desc"),
            ])
            .send()
            .await?;

        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let found: SearchResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse advisory search response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        if found.items.is_empty() {
            return Ok(None);
        }

        let records = found
            .items
            .into_iter()
            .take(ADVISORY_LIMIT)
            .map(|item| AdvisoryRecord {
                title: item.name,
                description: item
                    .description
                    .unwrap_or_else(|| NO_ADVISORY_DESCRIPTION.into()),
                updated: format_date(&item.updated_at),
                url: item.html_url,
            })
            .collect();

        Ok(Some(SourceData::Advisories(records)))
    }
}
