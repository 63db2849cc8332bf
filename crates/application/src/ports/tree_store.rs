use async_trait::async_trait;
use dnstree_domain::{DomainError, PackagedArchive, RenderedTree};
use std::sync::Arc;

/// Owner of the export root, its backup location and the archive directory.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Replaces one server set's directory with `tree`.
    ///
    /// The new tree is written to a staging location first; only once it is
    /// complete is the current directory moved to the backup location and
    /// the staged one moved into place. A failure before the swap leaves the
    /// current tree untouched.
    async fn replace_server_set(&self, tree: &RenderedTree) -> Result<(), DomainError>;

    /// Moves every server-set directory whose set is not in `keep` to the
    /// backup location, so that deleted sets drop out of the next package.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Arc<str>>)` - Names of the sets moved, sorted
    async fn retire_server_sets(&self, keep: &[Arc<str>]) -> Result<Vec<Arc<str>>, DomainError>;

    /// Packages the entire export root into a new archive, allocating the
    /// next iteration identifier.
    async fn package(&self) -> Result<PackagedArchive, DomainError>;
}
