use async_trait::async_trait;
use dnstree_application::ports::{PackageStager, StagedPackage, StagedServerSet};
use dnstree_domain::{server_set_from_directory, DomainError, IterationId};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::tree_store::latest_iteration;

/// Directory the archive is unpacked into, inside the private staging
/// directory. Checker diagnostics cite paths below it.
pub const STAGE_DIR: &str = "temp_dir";

/// Unpacks `dns_tree-<n>.tar` archives into throwaway directories.
pub struct TarPackageStager {
    archives: PathBuf,
}

impl TarPackageStager {
    pub fn new(archives: impl Into<PathBuf>) -> Self {
        Self {
            archives: archives.into(),
        }
    }

    fn archive_path(
        &self,
        iteration: Option<IterationId>,
    ) -> Result<(IterationId, PathBuf), DomainError> {
        let iteration = match iteration {
            Some(id) => id,
            None => latest_iteration(&self.archives)?.ok_or_else(|| {
                DomainError::NotFound(format!("No archive in {}", self.archives.display()))
            })?,
        };

        let path = self.archives.join(iteration.archive_file_name());
        if !path.is_file() {
            return Err(DomainError::NotFound(format!(
                "Archive {} does not exist",
                path.display()
            )));
        }
        Ok((iteration, path))
    }
}

#[async_trait]
impl PackageStager for TarPackageStager {
    #[instrument(skip(self))]
    async fn stage(&self, iteration: Option<IterationId>) -> Result<StagedPackage, DomainError> {
        let (iteration, archive) = self.archive_path(iteration)?;

        let package = tokio::task::spawn_blocking(move || stage_blocking(iteration, &archive))
            .await
            .map_err(|e| DomainError::PackagingError(format!("Staging task failed: {}", e)))??;

        debug!(
            iteration = %package.iteration,
            server_sets = package.server_sets.len(),
            root = %package.root().display(),
            "Package staged"
        );
        Ok(package)
    }
}

fn stage_blocking(iteration: IterationId, archive: &Path) -> Result<StagedPackage, DomainError> {
    let staging = tempfile::Builder::new().prefix("dnstree-check-").tempdir()?;
    let destination = staging.path().join(STAGE_DIR);
    fs::create_dir_all(&destination)?;

    unpack(archive, &destination).map_err(|e| {
        DomainError::PackagingError(format!("Cannot unpack {}: {}", archive.display(), e))
    })?;

    let server_sets = discover_server_sets(staging.path())?;
    Ok(StagedPackage::new(
        iteration,
        staging.path().to_path_buf(),
        server_sets,
        staging,
    ))
}

/// Extracts every member below `destination`, dropping the archive's
/// top-level directory.
fn unpack(archive: &Path, destination: &Path) -> io::Result<()> {
    let mut tar = tar::Archive::new(File::open(archive)?);

    for entry in tar.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        let mut components = path.components();
        components.next();
        let relative = components.as_path();
        if relative.as_os_str().is_empty() {
            continue;
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsafe member path {}", path.display()),
            ));
        }

        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&target)?;
    }

    Ok(())
}

fn discover_server_sets(staging_root: &Path) -> Result<Vec<StagedServerSet>, DomainError> {
    let mut server_sets = Vec::new();

    for entry in fs::read_dir(staging_root.join(STAGE_DIR))? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(server_set_from_directory) else {
            continue;
        };

        let directory = Path::new(STAGE_DIR).join(&file_name);
        let service_config = match fs::read_to_string(entry.path().join("named.conf")) {
            Ok(contents) => contents,
            // The checker reports the missing file itself.
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        server_sets.push(StagedServerSet {
            name: Arc::from(name),
            directory,
            service_config,
        });
    }

    server_sets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(server_sets)
}
