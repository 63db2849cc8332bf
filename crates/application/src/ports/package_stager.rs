use async_trait::async_trait;
use dnstree_domain::{DomainError, IterationId};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One server set found in a staged package.
#[derive(Debug, Clone)]
pub struct StagedServerSet {
    pub name: Arc<str>,
    /// Directory of the set, relative to the staging root.
    pub directory: PathBuf,
    /// Contents of the set's service config.
    pub service_config: String,
}

impl StagedServerSet {
    pub fn service_config_path(&self) -> PathBuf {
        self.directory.join("named.conf")
    }
}

/// A package unpacked into a private directory.
///
/// The directory lives as long as this value; dropping it removes the
/// directory on every exit path.
pub struct StagedPackage {
    pub iteration: IterationId,
    pub server_sets: Vec<StagedServerSet>,
    root: PathBuf,
    _cleanup: Box<dyn Any + Send + Sync>,
}

impl StagedPackage {
    pub fn new(
        iteration: IterationId,
        root: PathBuf,
        server_sets: Vec<StagedServerSet>,
        cleanup: impl Any + Send + Sync,
    ) -> Self {
        Self {
            iteration,
            server_sets,
            root,
            _cleanup: Box::new(cleanup),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
pub trait PackageStager: Send + Sync {
    /// Unpacks the archive of `iteration`, or the newest one when `None`.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no such archive exists
    /// * `DomainError::PackagingError` - If the archive cannot be read
    async fn stage(&self, iteration: Option<IterationId>) -> Result<StagedPackage, DomainError>;
}
