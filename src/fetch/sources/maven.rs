//! Maven Central solr search client

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

/// Default base URL for the Maven Central search API
const DEFAULT_BASE_URL: &str = "https://search.maven.org";

/// Response from `GET /solrsearch/select`
#[derive(Debug, Deserialize)]
struct SolrResponse {
    #[serde(default)]
    response: SolrBody,
}

#[derive(Debug, Deserialize, Default)]
struct SolrBody {
    #[serde(default)]
    docs: Vec<SolrDoc>,
}

#[derive(Debug, Deserialize)]
struct SolrDoc {
    id: Option<String>,
    #[serde(rename = "latestVersion")]
    latest_version: Option<String>,
    timestamp: Option<Value>,
    g: Option<String>,
    a: Option<String>,
}

/// Fetches the first matching artifact from the solr index
pub struct MavenSource {
    client: reqwest::Client,
    base_url: String,
}

impl MavenSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for MavenSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for MavenSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Maven
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/solrsearch/select", self.base_url);
        debug!("Searching Maven Central: {} q={}", url, software);

        let response = self
            .client
            .get(&url)
            .query(&[("q", software), ("rows", "1"), ("wt", "json")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: SolrResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Maven Central response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        let Some(doc) = data.response.docs.into_iter().next() else {
            return Ok(None);
        };

        let mut record = PackageRecord::new();
        record.push("Artifact", json!(doc.id));
        record.push("Latest Version", json!(doc.latest_version));
        record.push("Last Updated", doc.timestamp.unwrap_or(Value::Null));
        record.push("Group", json!(doc.g));
        record.push("ArtifactId", json!(doc.a));

        Ok(Some(SourceData::Package(record)))
    }
}
