//! RubyGems API client

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

/// Default base URL for RubyGems
const DEFAULT_BASE_URL: &str = "https://rubygems.org";

/// Response from `GET /api/v1/gems/{gem}.json`
#[derive(Debug, Deserialize)]
struct GemResponse {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    downloads: u64,
    version_created_at: Option<String>,
    licenses: Option<Licenses>,
}

/// Upstream sends either a list of licenses or a single scalar
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Licenses {
    Many(Vec<String>),
    One(String),
}

impl Licenses {
    fn joined(&self) -> String {
        match self {
            Licenses::Many(list) => list.join(", "),
            Licenses::One(license) => license.clone(),
        }
    }
}

/// Fetches gem metadata, normalizing the license field to one string
pub struct RubyGemsSource {
    client: reqwest::Client,
    base_url: String,
}

impl RubyGemsSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for RubyGemsSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for RubyGemsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RubyGems
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/api/v1/gems/{}.json", self.base_url, software);
        debug!("Fetching gem: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: GemResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse RubyGems response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        let mut record = PackageRecord::new();
        record.push("Gem Name", json!(data.name));
        record.push("Latest Version", json!(data.version));
        record.push("Downloads", data.downloads);
        record.push("Last Updated", json!(data.version_created_at));
        record.push(
            "License",
            data.licenses.map(|l| l.joined()).unwrap_or_default(),
        );

        Ok(Some(SourceData::Package(record)))
    }
}
