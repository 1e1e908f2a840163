//! Per-source fetch outcomes and the aggregated bundle

use indexmap::IndexMap;
use serde::Serialize;

use crate::fetch::error::SourceError;
use crate::fetch::types::{CommunityStats, SourceData};

/// Result of one fetch, resolved to exactly one of three states. Sources
/// never panic their way out; transport and schema faults surface here as
/// `Failure` with a short diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success(SourceData),
    Empty,
    Failure(String),
}

impl FetchOutcome {
    /// Folds the internal fetcher signature into the three-state outcome
    pub fn from_fetch(result: Result<Option<SourceData>, SourceError>) -> Self {
        match result {
            Ok(Some(data)) => FetchOutcome::Success(data),
            Ok(None) => FetchOutcome::Empty,
            Err(err) => FetchOutcome::Failure(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Payload of a successful fetch, if any
    pub fn data(&self) -> Option<&SourceData> {
        match self {
            FetchOutcome::Success(data) => Some(data),
            _ => None,
        }
    }
}

/// Everything one lookup produced, keyed by source display name in registry
/// order. Built once per query and handed to the presentation layer; nothing
/// here is cached or persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    pub software: String,
    pub outcomes: IndexMap<&'static str, FetchOutcome>,
    pub advisories: FetchOutcome,
    pub community: CommunityStats,
}
