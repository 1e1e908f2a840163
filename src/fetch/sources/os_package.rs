//! OS package manager lookup (stub)
//!
//! Distribution package indexes (Ubuntu, Alpine, …) have no stable public
//! JSON API to query by bare software name, so this source never calls out
//! and always reports no data. It stays in the registry so the bundle shape
//! does not change when a real implementation lands.

use crate::fetch::error::SourceError;
use crate::fetch::source::Source;
use crate::fetch::types::{SourceData, SourceKind};

#[derive(Debug, Default)]
pub struct OsPackageSource;

impl OsPackageSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Source for OsPackageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::OsPackage
    }

    async fn fetch(&self, _software: &str) -> Result<Option<SourceData>, SourceError> {
        Ok(None)
    }
}
