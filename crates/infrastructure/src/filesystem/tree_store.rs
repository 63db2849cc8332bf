use async_trait::async_trait;
use dnstree_application::ports::TreeStore;
use dnstree_domain::{
    server_set_directory, server_set_from_directory, DomainError, IterationId, PackagedArchive,
    RenderedTree,
};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Export root, backup and archive directories on the local filesystem.
///
/// ```text
/// <root>/<set>_servers/named.conf
/// <root>/<set>_servers/named/<view>/<zone>.db
/// <backup>/<set>_servers/...
/// <archives>/dns_tree-<n>.tar
/// ```
pub struct FsTreeStore {
    root: PathBuf,
    backup: PathBuf,
    archives: PathBuf,
    package_lock: Mutex<()>,
}

impl FsTreeStore {
    pub fn new(
        root: impl Into<PathBuf>,
        backup: impl Into<PathBuf>,
        archives: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            backup: backup.into(),
            archives: archives.into(),
            package_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TreeStore for FsTreeStore {
    #[instrument(skip(self, tree), fields(server_set = %tree.server_set))]
    async fn replace_server_set(&self, tree: &RenderedTree) -> Result<(), DomainError> {
        let root = self.root.clone();
        let backup = self.backup.clone();
        let tree = tree.clone();

        tokio::task::spawn_blocking(move || replace_blocking(&root, &backup, &tree))
            .await
            .map_err(|e| DomainError::IoError(format!("Export task failed: {}", e)))?
    }

    #[instrument(skip(self, keep))]
    async fn retire_server_sets(&self, keep: &[Arc<str>]) -> Result<Vec<Arc<str>>, DomainError> {
        let root = self.root.clone();
        let backup = self.backup.clone();
        let keep = keep.to_vec();

        let retired = tokio::task::spawn_blocking(move || retire_blocking(&root, &backup, &keep))
            .await
            .map_err(|e| DomainError::IoError(format!("Retire task failed: {}", e)))??;

        for server_set in &retired {
            info!(server_set = %server_set, "Server set no longer in model, moved to backup");
        }
        Ok(retired)
    }

    #[instrument(skip(self))]
    async fn package(&self) -> Result<PackagedArchive, DomainError> {
        let _guard = self.package_lock.lock().await;
        let root = self.root.clone();
        let archives = self.archives.clone();

        let archive = tokio::task::spawn_blocking(move || package_blocking(&root, &archives))
            .await
            .map_err(|e| DomainError::PackagingError(format!("Packaging task failed: {}", e)))??;

        info!(
            iteration = %archive.iteration,
            path = %archive.path.display(),
            "Tree packaged"
        );
        Ok(archive)
    }
}

fn replace_blocking(root: &Path, backup: &Path, tree: &RenderedTree) -> Result<(), DomainError> {
    let directory = server_set_directory(&tree.server_set);
    fs::create_dir_all(root)?;
    fs::create_dir_all(backup)?;

    // Staged next to the root so the final rename stays on one filesystem.
    let parent = root
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staging = tempfile::Builder::new()
        .prefix(".dnstree-staging-")
        .tempdir_in(parent)?;
    let staged = staging.path().join(&directory);

    for file in &tree.files {
        let path = staged.join(&file.relative_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, file.contents.as_bytes())?;
    }
    debug!(files = tree.files.len(), staging = %staged.display(), "Tree staged");

    let current = root.join(&directory);
    let previous = backup.join(&directory);

    if current.exists() {
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }
        fs::rename(&current, &previous)?;
    }

    if let Err(e) = fs::rename(&staged, &current) {
        // Put the previous tree back so the set is never left without one.
        if previous.exists() && !current.exists() {
            if let Err(restore) = fs::rename(&previous, &current) {
                warn!(error = %restore, "Failed to restore previous tree");
            }
        }
        return Err(e.into());
    }

    Ok(())
}

fn retire_blocking(
    root: &Path,
    backup: &Path,
    keep: &[Arc<str>],
) -> Result<Vec<Arc<str>>, DomainError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut retired = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(server_set_from_directory) else {
            continue;
        };
        if keep.iter().any(|set| set.as_ref() == name) {
            continue;
        }

        fs::create_dir_all(backup)?;
        let previous = backup.join(&file_name);
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }
        fs::rename(entry.path(), &previous)?;
        retired.push(Arc::from(name));
    }

    retired.sort();
    Ok(retired)
}

fn package_blocking(root: &Path, archives: &Path) -> Result<PackagedArchive, DomainError> {
    fs::create_dir_all(root)?;
    fs::create_dir_all(archives)?;
    let iteration = next_iteration(archives)?;
    let path = archives.join(iteration.archive_file_name());
    let partial = archives.join(format!(".{}.partial", iteration.archive_file_name()));

    let prefix = root
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dns_tree"));

    let write = || -> io::Result<()> {
        let file = File::options().write(true).create_new(true).open(&partial)?;
        let mut builder = tar::Builder::new(file);
        builder.mode(tar::HeaderMode::Deterministic);
        builder.append_dir(&prefix, root)?;
        for entry in sorted_entries(root)? {
            let name = prefix.join(entry.strip_prefix(root).unwrap_or(entry.as_path()));
            if entry.is_dir() {
                builder.append_dir(&name, &entry)?;
            } else {
                builder.append_path_with_name(&entry, &name)?;
            }
        }
        builder.into_inner()?.sync_all()
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(&partial);
        return Err(DomainError::PackagingError(e.to_string()));
    }
    fs::rename(&partial, &path).map_err(|e| DomainError::PackagingError(e.to_string()))?;

    Ok(PackagedArchive { iteration, path })
}

/// One past the highest `dns_tree-<n>.tar` in `archives`.
pub(crate) fn next_iteration(archives: &Path) -> Result<IterationId, DomainError> {
    Ok(latest_iteration(archives)?
        .map(IterationId::next)
        .unwrap_or(IterationId::FIRST))
}

pub(crate) fn latest_iteration(archives: &Path) -> Result<Option<IterationId>, DomainError> {
    let entries = match fs::read_dir(archives) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut latest = None;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(id) = name.to_str().and_then(IterationId::from_archive_file_name) {
            latest = latest.max(Some(id));
        }
    }
    Ok(latest)
}

/// Every path below `dir`, depth first, siblings sorted by name.
fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    children.sort();

    let mut out = Vec::new();
    for child in children {
        let is_dir = child.is_dir();
        out.push(child.clone());
        if is_dir {
            out.extend(sorted_entries(&child)?);
        }
    }
    Ok(out)
}
