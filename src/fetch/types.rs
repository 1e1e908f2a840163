//! Normalized record types shared across sources

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifies an external data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// endoflife.date API
    EndOfLife,
    /// GitHub repository search
    GitHub,
    /// npm registry (registry.npmjs.org)
    Npm,
    /// PyPI JSON API (pypi.org)
    PyPi,
    /// Docker Hub tags API
    DockerHub,
    /// RubyGems API (rubygems.org)
    RubyGems,
    /// Maven Central solr search
    Maven,
    /// OS package managers (unimplemented stub)
    OsPackage,
    /// GitHub advisory-flavored repository search
    Advisories,
    /// StackExchange tag info
    StackOverflow,
}

impl SourceKind {
    /// Returns the identifier used in logs and `--skip` flags
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::EndOfLife => "endoflife",
            SourceKind::GitHub => "github",
            SourceKind::Npm => "npm",
            SourceKind::PyPi => "pypi",
            SourceKind::DockerHub => "dockerhub",
            SourceKind::RubyGems => "rubygems",
            SourceKind::Maven => "maven",
            SourceKind::OsPackage => "os_package",
            SourceKind::Advisories => "advisories",
            SourceKind::StackOverflow => "stackoverflow",
        }
    }

    /// Returns the name shown to users and used as a bundle key
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::EndOfLife => "EndOfLife.date",
            SourceKind::GitHub => "GitHub",
            SourceKind::Npm => "NPM",
            SourceKind::PyPi => "PyPI",
            SourceKind::DockerHub => "Docker Hub",
            SourceKind::RubyGems => "RubyGems",
            SourceKind::Maven => "Maven Central",
            SourceKind::OsPackage => "OS Package Manager",
            SourceKind::Advisories => "Security Advisories",
            SourceKind::StackOverflow => "Stack Overflow",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw `eol`/`lts` field from endoflife.date: either a JSON bool or a date
/// string, depending on the product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolOrDate {
    Flag(bool),
    Date(String),
}

impl BoolOrDate {
    /// A bare `true` or a non-empty date string counts as set
    pub fn is_truthy(&self) -> bool {
        match self {
            BoolOrDate::Flag(flag) => *flag,
            BoolOrDate::Date(date) => !date.trim().is_empty(),
        }
    }
}

/// Support status derived from the upstream `eol` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SupportStatus {
    Active,
    #[serde(rename = "End of Life")]
    EndOfLife,
    Unknown,
}

impl SupportStatus {
    /// `Active` only when upstream says literally `eol: false`; any truthy
    /// value (a date or `true`) means end of life; anything else, including
    /// an absent field or an empty date string, stays `Unknown`.
    pub fn from_eol(eol: Option<&BoolOrDate>) -> Self {
        match eol {
            Some(BoolOrDate::Flag(false)) => SupportStatus::Active,
            Some(field) if field.is_truthy() => SupportStatus::EndOfLife,
            _ => SupportStatus::Unknown,
        }
    }
}

impl std::fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportStatus::Active => write!(f, "Active"),
            SupportStatus::EndOfLife => write!(f, "End of Life"),
            SupportStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One release cycle from endoflife.date with its derived support status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionRecord {
    pub cycle: String,
    pub release_date: Option<String>,
    pub eol: Option<BoolOrDate>,
    pub latest: Option<String>,
    pub lts: bool,
    pub status: SupportStatus,
}

impl VersionRecord {
    /// EOL column as shown to users
    pub fn eol_display(&self) -> String {
        match &self.eol {
            None => "Unknown".to_string(),
            Some(BoolOrDate::Flag(flag)) => flag.to_string(),
            Some(BoolOrDate::Date(date)) => date.clone(),
        }
    }
}

/// Placeholder when a repository has no description
pub const NO_DESCRIPTION: &str = "No description available";

/// Placeholder when a repository reports no primary language
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// One repository from a repository search, dates normalized to `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRecord {
    pub full_name: String,
    pub stars: u64,
    pub last_updated: String,
    pub description: String,
    pub language: String,
    pub forks: u64,
    pub open_issues: u64,
}

/// Registry-specific attribute mapping. Each registry exposes its own labels
/// ("Gem Name", "Artifact", …); the shape is deliberately not unified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PackageRecord {
    pub fields: IndexMap<String, serde_json::Value>,
}

impl PackageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.fields.insert(label.into(), value.into());
    }
}

/// Placeholder when an advisory repository has no description
pub const NO_ADVISORY_DESCRIPTION: &str = "No description";

/// One security-advisory search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryRecord {
    pub title: String,
    pub description: String,
    pub updated: String,
    pub url: String,
}

/// Stack Overflow tag stats, completed with a GitHub repository count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommunityStats {
    pub questions: u64,
    pub related_tags: Vec<String>,
    pub repositories: u64,
}

/// Question count and related tags for one Stack Overflow tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStats {
    pub questions: u64,
    pub related_tags: Vec<String>,
}

/// Payload of a successful fetch. Sources produce different record shapes,
/// so the registry iterates over this enum rather than a single record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceData {
    Versions(Vec<VersionRecord>),
    Repositories(Vec<RepositoryRecord>),
    Package(PackageRecord),
    Advisories(Vec<AdvisoryRecord>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(BoolOrDate::Flag(false)), SupportStatus::Active)]
    #[case(Some(BoolOrDate::Flag(true)), SupportStatus::EndOfLife)]
    #[case(Some(BoolOrDate::Date("2020-06-01".into())), SupportStatus::EndOfLife)]
    #[case(Some(BoolOrDate::Date(String::new())), SupportStatus::Unknown)]
    #[case(Some(BoolOrDate::Date("  ".into())), SupportStatus::Unknown)]
    #[case(None, SupportStatus::Unknown)]
    fn support_status_is_derived_from_the_raw_eol_field(
        #[case] eol: Option<BoolOrDate>,
        #[case] expected: SupportStatus,
    ) {
        assert_eq!(SupportStatus::from_eol(eol.as_ref()), expected);
    }

    #[test]
    fn bool_or_date_deserializes_both_shapes() {
        let flag: BoolOrDate = serde_json::from_str("false").unwrap();
        assert_eq!(flag, BoolOrDate::Flag(false));

        let date: BoolOrDate = serde_json::from_str("\"2027-10-31\"").unwrap();
        assert_eq!(date, BoolOrDate::Date("2027-10-31".into()));
    }

    #[test]
    fn package_record_preserves_insertion_order() {
        let mut record = PackageRecord::new();
        record.push("Package Name", "react");
        record.push("Latest Version", "19.0.0");
        record.push("Dependencies", 11);

        let labels: Vec<_> = record.fields.keys().cloned().collect();
        assert_eq!(labels, vec!["Package Name", "Latest Version", "Dependencies"]);
    }

    #[test]
    fn eol_display_shows_raw_upstream_value() {
        let record = VersionRecord {
            cycle: "3.8".into(),
            release_date: Some("2019-10-14".into()),
            eol: Some(BoolOrDate::Date("2024-10-07".into())),
            latest: Some("3.8.20".into()),
            lts: false,
            status: SupportStatus::EndOfLife,
        };
        assert_eq!(record.eol_display(), "2024-10-07");
    }
}
