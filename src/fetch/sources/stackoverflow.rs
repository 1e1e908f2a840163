//! StackExchange tag info client

use serde::Deserialize;
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::sources::status_error;
use crate::fetch::types::TagStats;

/// Default base URL for the StackExchange API
const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com";

/// Response from `GET /2.3/tags/{tag}/info`
#[derive(Debug, Deserialize)]
struct TagInfoResponse {
    #[serde(default)]
    items: Vec<TagInfo>,
}

#[derive(Debug, Deserialize)]
struct TagInfo {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    related_tags: Vec<RelatedTag>,
}

#[derive(Debug, Deserialize)]
struct RelatedTag {
    name: String,
}

/// Fetches question count and related tags for a Stack Overflow tag. Feeds
/// the community block of the bundle rather than a per-source outcome, so it
/// exposes a plain method instead of the `Source` trait.
pub struct StackOverflowSource {
    client: reqwest::Client,
    base_url: String,
}

impl StackOverflowSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }

    pub async fn tag_info(&self, software: &str) -> Result<Option<TagStats>, SourceError> {
        let url = format!("{}/2.3/tags/{}/info", self.base_url, software);
        debug!("Fetching tag info: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("site", "stackoverflow")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: TagInfoResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse StackExchange response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        // Only the first matching tag is relevant
        let Some(tag) = data.items.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(TagStats {
            questions: tag.count,
            related_tags: tag.related_tags.into_iter().map(|t| t.name).collect(),
        }))
    }
}

impl Default for StackOverflowSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
