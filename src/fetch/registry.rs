//! Ordered source registry
//!
//! Maps display names to fetchers in a fixed order; the bundle and every
//! rendered section follow this order. Adding a source means adding one
//! entry here, nothing else changes.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::SourcesConfig;
use crate::fetch::source::Source;
use crate::fetch::sources::{
    DockerHubSource, EndOfLifeSource, GitHubSource, MavenSource, NpmSource, OsPackageSource,
    PyPiSource, RubyGemsSource,
};
use crate::fetch::types::SourceKind;

/// Builds the registry from the enable flags, in display order
pub fn sources(config: &SourcesConfig) -> IndexMap<&'static str, Arc<dyn Source>> {
    let mut registry: IndexMap<&'static str, Arc<dyn Source>> = IndexMap::new();

    let mut add = |enabled: bool, kind: SourceKind, source: Arc<dyn Source>| {
        if enabled {
            registry.insert(kind.display_name(), source);
        }
    };

    add(
        config.endoflife,
        SourceKind::EndOfLife,
        Arc::new(EndOfLifeSource::default()),
    );
    add(
        config.github,
        SourceKind::GitHub,
        Arc::new(GitHubSource::default()),
    );
    add(config.npm, SourceKind::Npm, Arc::new(NpmSource::default()));
    add(
        config.pypi,
        SourceKind::PyPi,
        Arc::new(PyPiSource::default()),
    );
    add(
        config.dockerhub,
        SourceKind::DockerHub,
        Arc::new(DockerHubSource::default()),
    );
    add(
        config.rubygems,
        SourceKind::RubyGems,
        Arc::new(RubyGemsSource::default()),
    );
    add(
        config.maven,
        SourceKind::Maven,
        Arc::new(MavenSource::default()),
    );
    add(
        config.os_package,
        SourceKind::OsPackage,
        Arc::new(OsPackageSource::new()),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_all_sources_in_display_order() {
        let registry = sources(&SourcesConfig::default());
        let names: Vec<_> = registry.keys().copied().collect();

        assert_eq!(
            names,
            vec![
                "EndOfLife.date",
                "GitHub",
                "NPM",
                "PyPI",
                "Docker Hub",
                "RubyGems",
                "Maven Central",
                "OS Package Manager",
            ]
        );
    }

    #[test]
    fn disabled_sources_are_left_out() {
        let mut config = SourcesConfig::default();
        config.disable("dockerhub");
        config.disable("maven");

        let registry = sources(&config);
        assert_eq!(registry.len(), 6);
        assert!(!registry.contains_key("Docker Hub"));
        assert!(!registry.contains_key("Maven Central"));
        // Order of the remaining entries is unchanged
        assert_eq!(registry.keys().next().copied(), Some("EndOfLife.date"));
    }
}
