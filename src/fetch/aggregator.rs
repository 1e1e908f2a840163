//! Concurrent fan-out/fan-in over every registered source
//!
//! All fetchers run at once and the bundle is bounded by the slowest single
//! source instead of the sum of all of them. Each fetch carries its own
//! deadline; an elapsed deadline becomes a `Failure` outcome, never a hang,
//! and no source can block or alter another source's outcome.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::time::timeout;
use tracing::warn;

use crate::config::{SourcesConfig, FETCH_TIMEOUT_SECS};
use crate::fetch::error::LookupError;
use crate::fetch::outcome::{Bundle, FetchOutcome};
use crate::fetch::registry;
use crate::fetch::source::Source;
use crate::fetch::sources::{AdvisorySource, GitHubSource, StackOverflowSource};
use crate::fetch::types::{CommunityStats, TagStats};

pub struct Aggregator {
    sources: IndexMap<&'static str, Arc<dyn Source>>,
    advisory: Arc<dyn Source>,
    stackoverflow: StackOverflowSource,
    github: GitHubSource,
    fetch_timeout: Duration,
}

impl Aggregator {
    /// Builds an aggregator over the real endpoints
    pub fn new(config: &SourcesConfig, fetch_timeout: Duration) -> Self {
        Self {
            sources: registry::sources(config),
            advisory: Arc::new(AdvisorySource::default()),
            stackoverflow: StackOverflowSource::default(),
            github: GitHubSource::default(),
            fetch_timeout,
        }
    }

    /// Assembles an aggregator from explicit parts, used by tests to inject
    /// sources pointing at stub servers
    pub fn with_parts(
        sources: IndexMap<&'static str, Arc<dyn Source>>,
        advisory: Arc<dyn Source>,
        stackoverflow: StackOverflowSource,
        github: GitHubSource,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            advisory,
            stackoverflow,
            github,
            fetch_timeout,
        }
    }

    /// Queries every source for a software name and collects one bundle.
    /// The bundle always carries an outcome for every registered source.
    pub async fn lookup(&self, software: &str) -> Result<Bundle, LookupError> {
        let software = software.trim();
        if software.is_empty() {
            return Err(LookupError::EmptyName);
        }

        let fetches = self.sources.iter().map(|(name, source)| {
            let source = Arc::clone(source);
            async move { (*name, run(source.as_ref(), software, self.fetch_timeout).await) }
        });

        let (outcomes, advisories, community) = tokio::join!(
            join_all(fetches),
            run(self.advisory.as_ref(), software, self.fetch_timeout),
            self.community(software),
        );

        Ok(Bundle {
            software: software.to_string(),
            outcomes: outcomes.into_iter().collect(),
            advisories,
            community,
        })
    }

    /// Community stats degrade to zeros on any fault; they decorate the
    /// bundle rather than gate it
    async fn community(&self, software: &str) -> CommunityStats {
        let (tags, repositories) = tokio::join!(
            self.stackoverflow.tag_info(software),
            self.github.repository_count(software),
        );

        let tag_stats = match tags {
            Ok(Some(stats)) => stats,
            Ok(None) => TagStats::default(),
            Err(err) => {
                warn!("Tag stats unavailable: {}", err);
                TagStats::default()
            }
        };
        let repositories = repositories.unwrap_or_else(|err| {
            warn!("Repository count unavailable: {}", err);
            0
        });

        CommunityStats {
            questions: tag_stats.questions,
            related_tags: tag_stats.related_tags,
            repositories,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(
            &SourcesConfig::default(),
            Duration::from_secs(FETCH_TIMEOUT_SECS),
        )
    }
}

async fn run(source: &dyn Source, software: &str, deadline: Duration) -> FetchOutcome {
    let kind = source.kind();
    match timeout(deadline, source.fetch(software)).await {
        Ok(result) => {
            if let Err(err) = &result {
                warn!("{} fetch failed: {}", kind, err);
            }
            FetchOutcome::from_fetch(result)
        }
        Err(_) => {
            warn!("{} fetch timed out after {:?}", kind, deadline);
            FetchOutcome::Failure(format!("timed out after {}s", deadline.as_secs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::SourceError;
    use crate::fetch::source::MockSource;
    use crate::fetch::types::{PackageRecord, SourceData, SourceKind};

    fn unreachable_community() -> (StackOverflowSource, GitHubSource) {
        (
            StackOverflowSource::new("http://127.0.0.1:1"),
            GitHubSource::new("http://127.0.0.1:1"),
        )
    }

    fn empty_advisory() -> Arc<dyn Source> {
        let mut advisory = MockSource::new();
        advisory
            .expect_kind()
            .return_const(SourceKind::Advisories);
        advisory.expect_fetch().returning(|_| Ok(None));
        Arc::new(advisory)
    }

    #[tokio::test]
    async fn lookup_rejects_empty_and_whitespace_names() {
        let (stackoverflow, github) = unreachable_community();
        let aggregator = Aggregator::with_parts(
            IndexMap::new(),
            empty_advisory(),
            stackoverflow,
            github,
            Duration::from_secs(1),
        );

        assert!(matches!(
            aggregator.lookup("").await,
            Err(LookupError::EmptyName)
        ));
        assert!(matches!(
            aggregator.lookup("   ").await,
            Err(LookupError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn one_failing_source_does_not_disturb_the_others() {
        let mut healthy = MockSource::new();
        healthy.expect_kind().return_const(SourceKind::Npm);
        healthy.expect_fetch().returning(|_| {
            let mut record = PackageRecord::new();
            record.push("Package Name", "react");
            Ok(Some(SourceData::Package(record)))
        });

        let mut broken = MockSource::new();
        broken.expect_kind().return_const(SourceKind::Maven);
        broken
            .expect_fetch()
            .returning(|_| Err(SourceError::InvalidResponse("boom".into())));

        let mut sources: IndexMap<&'static str, Arc<dyn Source>> = IndexMap::new();
        sources.insert("NPM", Arc::new(healthy));
        sources.insert("Maven Central", Arc::new(broken));

        let (stackoverflow, github) = unreachable_community();
        let aggregator = Aggregator::with_parts(
            sources,
            empty_advisory(),
            stackoverflow,
            github,
            Duration::from_secs(1),
        );

        let bundle = aggregator.lookup("react").await.unwrap();

        assert!(bundle.outcomes["NPM"].is_success());
        assert!(matches!(
            &bundle.outcomes["Maven Central"],
            FetchOutcome::Failure(message) if message.contains("boom")
        ));
        assert_eq!(bundle.advisories, FetchOutcome::Empty);
    }

    #[tokio::test]
    async fn bundle_keys_follow_registry_order() {
        let mut sources: IndexMap<&'static str, Arc<dyn Source>> = IndexMap::new();
        for (name, kind) in [
            ("EndOfLife.date", SourceKind::EndOfLife),
            ("GitHub", SourceKind::GitHub),
            ("NPM", SourceKind::Npm),
        ] {
            let mut mock = MockSource::new();
            mock.expect_kind().return_const(kind);
            mock.expect_fetch().returning(|_| Ok(None));
            sources.insert(name, Arc::new(mock));
        }

        let (stackoverflow, github) = unreachable_community();
        let aggregator = Aggregator::with_parts(
            sources,
            empty_advisory(),
            stackoverflow,
            github,
            Duration::from_secs(1),
        );

        let bundle = aggregator.lookup("python").await.unwrap();
        let names: Vec<_> = bundle.outcomes.keys().copied().collect();
        assert_eq!(names, vec!["EndOfLife.date", "GitHub", "NPM"]);
        assert!(bundle
            .outcomes
            .values()
            .all(|outcome| *outcome == FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn slow_source_resolves_to_a_timeout_failure() {
        struct SlowSource;

        #[async_trait::async_trait]
        impl Source for SlowSource {
            fn kind(&self) -> SourceKind {
                SourceKind::DockerHub
            }

            async fn fetch(
                &self,
                _software: &str,
            ) -> Result<Option<SourceData>, SourceError> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(None)
            }
        }

        let mut sources: IndexMap<&'static str, Arc<dyn Source>> = IndexMap::new();
        sources.insert("Docker Hub", Arc::new(SlowSource));

        let (stackoverflow, github) = unreachable_community();
        let aggregator = Aggregator::with_parts(
            sources,
            empty_advisory(),
            stackoverflow,
            github,
            Duration::from_millis(10),
        );

        let bundle = aggregator.lookup("nginx").await.unwrap();
        assert!(matches!(
            &bundle.outcomes["Docker Hub"],
            FetchOutcome::Failure(message) if message.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn community_stats_default_to_zero_when_unreachable() {
        let (stackoverflow, github) = unreachable_community();
        let aggregator = Aggregator::with_parts(
            IndexMap::new(),
            empty_advisory(),
            stackoverflow,
            github,
            Duration::from_secs(1),
        );

        let bundle = aggregator.lookup("python").await.unwrap();
        assert_eq!(bundle.community, CommunityStats::default());
    }
}
