use serde::Deserialize;

// =============================================================================
// Fetch constants
// =============================================================================

/// Timeout applied to every outbound request (10 seconds)
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("eoltrack/", env!("CARGO_PKG_VERSION"));

/// How many repositories to keep from a repository search
pub const REPOSITORY_LIMIT: usize = 5;

/// How many security advisories to keep
pub const ADVISORY_LIMIT: usize = 3;

/// How many PyPI classifiers to show
pub const CLASSIFIER_LIMIT: usize = 3;

/// Per-source enable flags. Disabled sources are left out of the registry
/// entirely, so the bundle contains no entry for them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SourcesConfig {
    pub endoflife: bool,
    pub github: bool,
    pub npm: bool,
    pub pypi: bool,
    pub dockerhub: bool,
    pub rubygems: bool,
    pub maven: bool,
    pub os_package: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            endoflife: true,
            github: true,
            npm: true,
            pypi: true,
            dockerhub: true,
            rubygems: true,
            maven: true,
            os_package: true,
        }
    }
}

impl SourcesConfig {
    /// Disables a source by its identifier. Returns false when the name
    /// matches no known source.
    pub fn disable(&mut self, name: &str) -> bool {
        match name.to_lowercase().as_str() {
            "endoflife" => self.endoflife = false,
            "github" => self.github = false,
            "npm" => self.npm = false,
            "pypi" => self.pypi = false,
            "dockerhub" => self.dockerhub = false,
            "rubygems" => self.rubygems = false,
            "maven" => self.maven = false,
            "os_package" => self.os_package = false,
            _ => return false,
        }
        true
    }
}
