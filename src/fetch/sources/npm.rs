//! npm registry API client

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

/// Default base URL for the npm registry
const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Response from `GET /{package}`
#[derive(Debug, Deserialize)]
struct NpmResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, NpmVersion>,
    #[serde(default)]
    time: HashMap<String, String>,
    /// The public registry does not serve download stats on this endpoint;
    /// defaults to 0
    #[serde(default)]
    downloads: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct NpmVersion {
    license: Option<Value>,
    #[serde(default)]
    dependencies: HashMap<String, String>,
}

/// Resolves the latest version through the dist-tags indirection
pub struct NpmSource {
    client: reqwest::Client,
    base_url: String,
}

impl NpmSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for NpmSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for NpmSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Npm
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/{}", self.base_url, software);
        debug!("Fetching npm package: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: NpmResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        // No "latest" dist-tag means the package has nothing published
        let Some(latest) = data.dist_tags.get("latest") else {
            return Ok(None);
        };
        let version_info = data.versions.get(latest).cloned().unwrap_or_default();

        let mut record = PackageRecord::new();
        record.push("Package Name", software);
        record.push("Latest Version", latest.as_str());
        record.push("Last Published", json!(data.time.get(latest)));
        record.push("License", version_info.license.unwrap_or(Value::Null));
        record.push("Dependencies", version_info.dependencies.len());
        record.push(
            "Downloads",
            data.downloads.get("last-month").cloned().unwrap_or(json!(0)),
        );

        Ok(Some(SourceData::Package(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_resolves_latest_through_dist_tags() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/express")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "dist-tags": {"latest": "4.19.2"},
                    "versions": {
                        "4.19.2": {
                            "license": "MIT",
                            "dependencies": {"accepts": "~1.3.8", "body-parser": "1.20.2"}
                        }
                    },
                    "time": {"4.19.2": "2024-03-25T14:00:00.000Z"}
                }"#,
            )
            .create_async()
            .await;

        let source = NpmSource::new(&server.url());
        let result = source.fetch("express").await.unwrap().unwrap();

        mock.assert_async().await;
        let SourceData::Package(record) = result else {
            panic!("expected package record");
        };
        assert_eq!(record.fields["Latest Version"], json!("4.19.2"));
        assert_eq!(record.fields["Dependencies"], json!(2));
        assert_eq!(record.fields["Downloads"], json!(0));
        assert_eq!(
            record.fields["Last Published"],
            json!("2024-03-25T14:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn fetch_returns_empty_without_latest_dist_tag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ghost-package")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"dist-tags": {}, "versions": {}}"#)
            .create_async()
            .await;

        let source = NpmSource::new(&server.url());
        let result = source.fetch("ghost-package").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_empty_for_unknown_package() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/nonexistent")
            .with_status(404)
            .create_async()
            .await;

        let source = NpmSource::new(&server.url());
        let result = source.fetch("nonexistent").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn fetch_handles_object_license() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/oldpkg")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "dist-tags": {"latest": "1.0.0"},
                    "versions": {"1.0.0": {"license": {"type": "BSD-3-Clause"}}},
                    "time": {}
                }"#,
            )
            .create_async()
            .await;

        let source = NpmSource::new(&server.url());
        let result = source.fetch("oldpkg").await.unwrap().unwrap();

        mock.assert_async().await;
        let SourceData::Package(record) = result else {
            panic!("expected package record");
        };
        assert_eq!(record.fields["License"], json!({"type": "BSD-3-Clause"}));
        assert_eq!(record.fields["Last Published"], Value::Null);
    }
}
