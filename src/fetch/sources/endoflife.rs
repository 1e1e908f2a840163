//! endoflife.date API client

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::sources::status_error;
use crate::fetch::types::{BoolOrDate, SourceData, SourceKind, SupportStatus, VersionRecord};

/// Default base URL for the endoflife.date API
const DEFAULT_BASE_URL: &str = "https://endoflife.date";

/// One release cycle as returned by `GET /api/{product}.json`
#[derive(Debug, Deserialize)]
struct Cycle {
    /// Cycle identifiers are usually strings but sometimes bare numbers
    #[serde(default)]
    cycle: Value,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    eol: Option<BoolOrDate>,
    latest: Option<String>,
    lts: Option<BoolOrDate>,
}

/// Fetches release cycles and derives a support status per cycle
pub struct EndOfLifeSource {
    client: reqwest::Client,
    base_url: String,
}

impl EndOfLifeSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: crate::fetch::http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for EndOfLifeSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Cycle identifiers come back as strings or numbers; show both verbatim
fn cycle_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "Unknown".to_string(),
    }
}

#[async_trait::async_trait]
impl Source for EndOfLifeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::EndOfLife
    }

    async fn fetch(&self, software: &str) -> Result<Option<SourceData>, SourceError> {
        let url = format!("{}/api/{}.json", self.base_url, software);
        debug!("Fetching EOL cycles: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if let Some(err) = status_error(&response) {
            return Err(err);
        }

        let cycles: Vec<Cycle> = response.json().await.map_err(|e| {
            warn!("Failed to parse endoflife.date response: {}", e);
            SourceError::InvalidResponse(e.to_string())
        })?;

        if cycles.is_empty() {
            return Ok(None);
        }

        let records = cycles
            .into_iter()
            .map(|cycle| VersionRecord {
                status: SupportStatus::from_eol(cycle.eol.as_ref()),
                cycle: cycle_label(&cycle.cycle),
                release_date: cycle.release_date,
                eol: cycle.eol,
                latest: cycle.latest,
                lts: cycle.lts.as_ref().is_some_and(BoolOrDate::is_truthy),
            })
            .collect();

        Ok(Some(SourceData::Versions(records)))
    }
}
