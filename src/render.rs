//! Stateless projection of a finished bundle
//!
//! Rendering never participates in fetching: it consumes a complete
//! [`Bundle`] and produces text, so the fetch layer stays pure data.

use std::fmt::Write;

use crate::fetch::outcome::{Bundle, FetchOutcome};
use crate::fetch::types::{
    AdvisoryRecord, PackageRecord, RepositoryRecord, SourceData, SupportStatus, VersionRecord,
};

/// Risk label derived from how many advisory hits came back
pub fn risk_label(advisories: &FetchOutcome) -> &'static str {
    let count = match advisories.data() {
        Some(SourceData::Advisories(records)) => records.len(),
        _ => 0,
    };
    match count {
        0 => "Low Risk",
        1..=2 => "Medium Risk",
        _ => "High Risk",
    }
}

/// Counts of active and end-of-life cycles in the EOL outcome
pub fn status_counts(versions: &[VersionRecord]) -> (usize, usize) {
    let active = versions
        .iter()
        .filter(|v| v.status == SupportStatus::Active)
        .count();
    let eol = versions
        .iter()
        .filter(|v| v.status == SupportStatus::EndOfLife)
        .count();
    (active, eol)
}

/// The cycle with the newest release date, if any carries one
pub fn latest_cycle(versions: &[VersionRecord]) -> Option<&str> {
    versions
        .iter()
        .filter(|v| v.release_date.is_some())
        .max_by(|a, b| a.release_date.cmp(&b.release_date))
        .map(|v| v.cycle.as_str())
}

/// Renders the bundle as plain text sections in registry order
pub fn render_text(bundle: &Bundle) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Analysis results for \"{}\"", bundle.software);
    let _ = writeln!(out);

    render_overview(&mut out, bundle);

    for (name, outcome) in &bundle.outcomes {
        let _ = writeln!(out, "## {name}");
        match outcome {
            FetchOutcome::Success(data) => render_data(&mut out, data),
            FetchOutcome::Empty => {
                let _ = writeln!(out, "  no data found for \"{}\"", bundle.software);
            }
            FetchOutcome::Failure(message) => {
                let _ = writeln!(out, "  error: {message}");
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Security Advisories");
    match &bundle.advisories {
        FetchOutcome::Success(data) => render_data(&mut out, data),
        FetchOutcome::Empty => {
            let _ = writeln!(out, "  no recent security advisories found");
        }
        FetchOutcome::Failure(message) => {
            let _ = writeln!(out, "  error: {message}");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Community");
    let _ = writeln!(
        out,
        "  Stack Overflow questions: {}",
        bundle.community.questions
    );
    let _ = writeln!(
        out,
        "  GitHub repositories: {}",
        bundle.community.repositories
    );
    if !bundle.community.related_tags.is_empty() {
        let _ = writeln!(
            out,
            "  related tags: {}",
            bundle.community.related_tags.join(", ")
        );
    }

    out
}

/// Serializes the bundle as pretty-printed JSON
pub fn render_json(bundle: &Bundle) -> serde_json::Result<String> {
    serde_json::to_string_pretty(bundle)
}

fn render_overview(out: &mut String, bundle: &Bundle) {
    let _ = writeln!(out, "## Overview");
    if let Some(SourceData::Versions(versions)) = bundle
        .outcomes
        .get("EndOfLife.date")
        .and_then(FetchOutcome::data)
    {
        let (active, eol) = status_counts(versions);
        let _ = writeln!(out, "  active versions: {active}");
        let _ = writeln!(out, "  EOL versions: {eol}");
        let _ = writeln!(
            out,
            "  latest version: {}",
            latest_cycle(versions).unwrap_or("Unknown")
        );
    }
    let _ = writeln!(out, "  security status: {}", risk_label(&bundle.advisories));
    let _ = writeln!(out);
}

fn render_data(out: &mut String, data: &SourceData) {
    match data {
        SourceData::Versions(records) => render_versions(out, records),
        SourceData::Repositories(records) => render_repositories(out, records),
        SourceData::Package(record) => render_package(out, record),
        SourceData::Advisories(records) => render_advisories(out, records),
    }
}

fn render_versions(out: &mut String, records: &[VersionRecord]) {
    for record in records {
        let _ = writeln!(
            out,
            "  {:<10} released {:<12} EOL {:<12} {}{}",
            record.cycle,
            record.release_date.as_deref().unwrap_or("Unknown"),
            record.eol_display(),
            record.status,
            if record.lts { " (LTS)" } else { "" },
        );
    }
}

fn render_repositories(out: &mut String, records: &[RepositoryRecord]) {
    for record in records {
        let _ = writeln!(
            out,
            "  {} ★{} [{}] updated {} ({} forks, {} open issues)",
            record.full_name,
            record.stars,
            record.language,
            record.last_updated,
            record.forks,
            record.open_issues,
        );
        let _ = writeln!(out, "    {}", record.description);
    }
}

fn render_package(out: &mut String, record: &PackageRecord) {
    for (label, value) in &record.fields {
        let shown = match value {
            serde_json::Value::Null => "Unknown".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let _ = writeln!(out, "  {label}: {shown}");
    }
}

fn render_advisories(out: &mut String, records: &[AdvisoryRecord]) {
    for record in records {
        let _ = writeln!(out, "  {} (updated {})", record.title, record.updated);
        let _ = writeln!(out, "    {}", record.description);
        let _ = writeln!(out, "    {}", record.url);
    }
}
