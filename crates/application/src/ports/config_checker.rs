use async_trait::async_trait;
use dnstree_domain::{CheckOutput, CheckTarget, DomainError};
use std::path::Path;

/// Capability to run the authoritative external checkers.
///
/// `target` paths are relative to `working_dir`, which is also the directory
/// the checker runs in, so diagnostics cite stable relative paths.
///
/// # Errors
///
/// Only failures of the tool itself are errors (`CheckerUnavailable`,
/// `CheckerTimeout`, `CheckerCrashed`). Problems in the checked files come
/// back as output text.
#[async_trait]
pub trait ConfigChecker: Send + Sync {
    async fn check(
        &self,
        working_dir: &Path,
        target: &CheckTarget,
    ) -> Result<CheckOutput, DomainError>;
}
