//! Concrete source implementations
//!
//! Every source follows the same status policy: 404 means "no data" and maps
//! to an empty fetch, 403/429 surface as a rate-limit error, and any other
//! non-2xx status is an unexpected-status error. The original tool only
//! special-cased a GitHub 403; that handling is generalized here.

pub mod advisories;
pub mod dockerhub;
pub mod endoflife;
pub mod github;
pub mod maven;
pub mod npm;
pub mod os_package;
pub mod pypi;
pub mod rubygems;
pub mod stackoverflow;

pub use advisories::AdvisorySource;
pub use dockerhub::DockerHubSource;
pub use endoflife::EndOfLifeSource;
pub use github::GitHubSource;
pub use maven::MavenSource;
pub use npm::NpmSource;
pub use os_package::OsPackageSource;
pub use pypi::PyPiSource;
pub use rubygems::RubyGemsSource;
pub use stackoverflow::StackOverflowSource;

use chrono::DateTime;
use reqwest::{Response, StatusCode};

use crate::fetch::error::SourceError;

/// Screens a non-404 response status. Returns `None` for 2xx, a rate-limit
/// error for 403/429 (carrying `retry-after` when present), and an
/// unexpected-status error otherwise. 404 is handled by each source since it
/// means "no data", not a fault.
pub(crate) fn status_error(response: &Response) -> Option<SourceError> {
    let status = response.status();
    if status.is_success() {
        return None;
    }
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Some(SourceError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    Some(SourceError::UnexpectedStatus(status))
}

/// Normalizes an ISO-8601 timestamp to `YYYY-MM-DD`. Falls back to the raw
/// string when upstream sends something unparseable.
pub(crate) fn format_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
