//! GitHub repository search client

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::REPOSITORY_LIMIT;
use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::{format_date, status_error};
use crate::fetch::types::{
    RepositoryRecord, SourceData, SourceKind, NO_DESCRIPTION, UNKNOWN_LANGUAGE,
};

/// Default base URL for the GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from the repository search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    updated_at: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
}

/// Searches repositories by name, most recently updated first
pub struct GitHubSource {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, SourceError> {
        let url = format!("{}/search/repositories", self.base_url);
        debug!("Searching repositories: {} q={}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("sort", "updated"), ("order", "desc")])
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse repository search response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })
    }

    /// How many repositories carry the software name, used to complete the
    /// community stats. One extra search request reading only the count.
    pub async fn repository_count(&self, software: &str) -> Result<u64, SourceError> {
        let query = format!("{software} in:name");
        let found = self.search(&query).await?;
        Ok(found.total_count)
    }
}

impl Default for GitHubSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Source for GitHubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let found = self.search(software).await?;

        if found.items.is_empty() {
            return Ok(None);
        }

        let records = found
            .items
            .into_iter()
            .take(REPOSITORY_LIMIT)
            .map(|repo| RepositoryRecord {
                full_name: repo.full_name,
                stars: repo.stargazers_count,
                last_updated: format_date(&repo.updated_at),
                description: repo.description.unwrap_or_else(|| NO_DESCRIPTION.into()),
                language: repo.language.unwrap_or_else(|| UNKNOWN_LANGUAGE.into()),
                forks: repo.forks_count,
                open_issues: repo.open_issues_count,
            })
            .collect();

        Ok(Some(SourceData::Repositories(records)))
    }
}
