//! Docker Hub tags API client

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

/// Default base URL for Docker Hub
const DEFAULT_BASE_URL: &str = "https://hub.docker.com";

/// Response from the tags endpoint; only the first tag is inspected
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: Option<String>,
    last_updated: Option<String>,
    pull_count: Option<Value>,
}

/// Looks up the most recent tag of an official (library) image
pub struct DockerHubSource {
    client: reqwest::Client,
    base_url: String,
}

impl DockerHubSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for DockerHubSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for DockerHubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DockerHub
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!(
            "{}/v2/repositories/library/{}/tags",
            self.base_url, software
        );
        debug!("Fetching Docker Hub tags: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("page_size", "1")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let data: TagsResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Docker Hub response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        let Some(tag) = data.results.into_iter().next() else {
            return Ok(None);
        };

        let mut record = PackageRecord::new();
        record.push("Image", software);
        record.push("Tag", json!(tag.name));
        record.push("Updated", json!(tag.last_updated));
        record.push("Pulls", tag.pull_count.unwrap_or(json!("N/A")));

        Ok(Some(SourceData::Package(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn fetch_inspects_only_the_first_tag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/repositories/library/nginx/tags")
            .match_query(Matcher::UrlEncoded("page_size".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [
                    {"name": "1.27.0", "last_updated": "2024-06-01T00:00:00Z", "pull_count": 1000}
                ]}"#,
            )
            .create_async()
            .await;

        let source = DockerHubSource::new(&server.url());
        let result = source.fetch("nginx").await.unwrap().unwrap();

        mock.assert_async().await;
        let SourceData::Package(record) = result else {
            panic!("expected package record");
        };
        assert_eq!(record.fields["Image"], json!("nginx"));
        assert_eq!(record.fields["Tag"], json!("1.27.0"));
        assert_eq!(record.fields["Pulls"], json!(1000));
    }

    #[tokio::test]
    async fn fetch_defaults_missing_pull_count() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/repositories/library/nginx/tags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"name": "latest"}]}"#)
            .create_async()
            .await;

        let source = DockerHubSource::new(&server.url());
        let result = source.fetch("nginx").await.unwrap().unwrap();

        mock.assert_async().await;
        let SourceData::Package(record) = result else {
            panic!("expected package record");
        };
        assert_eq!(record.fields["Pulls"], json!("N/A"));
    }

    #[tokio::test]
    async fn fetch_returns_empty_without_tags() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/repositories/library/notanimage/tags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let source = DockerHubSource::new(&server.url());
        let result = source.fetch("notanimage").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn fetch_returns_empty_for_unknown_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/repositories/library/ghost/tags")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let source = DockerHubSource::new(&server.url());
        let result = source.fetch("ghost").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }
}
