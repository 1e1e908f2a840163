//! PyPI JSON API client

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CLASSIFIER_LIMIT;
use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

/// Default base URL for PyPI
const DEFAULT_BASE_URL: &str = "https://pypi.org";

/// Response from `GET /pypi/{package}/json`
#[derive(Debug, Deserialize)]
struct PyPiResponse {
    info: PyPiInfo,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    version: Option<String>,
    upload_time: Option<String>,
    license: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
    /// Legacy block; modern PyPI serves -1 counters, older mirrors real ones
    #[serde(default)]
    downloads: HashMap<String, Value>,
}

/// Fetches package metadata from the PyPI JSON API
pub struct PyPiSource {
    client: reqwest::Client,
    base_url: String,
}

impl PyPiSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for PyPiSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for PyPiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PyPi
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/pypi/{}/json", self.base_url, software);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: PyPiResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse PyPI response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        let info = data.info;
        let classifiers = info
            .classifiers
            .iter()
            .take(CLASSIFIER_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        let mut record = PackageRecord::new();
        record.push("Package Name", software);
        record.push("Latest Version", json!(info.version));
        record.push("Last Published", json!(info.upload_time));
        record.push("License", json!(info.license));
        record.push("Python Versions", classifiers);
        record.push(
            "Downloads",
            info.downloads.get("last_month").cloned().unwrap_or(json!(0)),
        );

        Ok(Some(SourceData::Package(record)))
    }
}
