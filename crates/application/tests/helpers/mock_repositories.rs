#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use dnstree_application::ports::{
    ConfigChecker, ModelProvider, PackageStager, StagedPackage, StagedServerSet, TreeStore,
};
use dnstree_domain::{
    server_set_directory, server_set_from_directory, Acl, CheckOutput, CheckTarget, DnsServer,
    DnsServerSet, DomainError, GlobalOption, IterationId, PackagedArchive, RenderedTree,
    ResourceRecord, ServerSetAssignment, ServerSetViewAssignment, View, ViewAclAssignment,
    ViewScope, Zone,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Directory the fakes pretend packages are unpacked into.
pub const STAGE_DIR: &str = "temp_dir";

// ============================================================================
// Mock ModelProvider
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Model {
    pub views: Vec<View>,
    pub zones: Vec<Zone>,
    pub records: Vec<ResourceRecord>,
    pub acls: Vec<Acl>,
    pub view_acl_assignments: Vec<ViewAclAssignment>,
    pub servers: Vec<DnsServer>,
    pub server_sets: Vec<DnsServerSet>,
    pub server_set_assignments: Vec<ServerSetAssignment>,
    pub server_set_view_assignments: Vec<ServerSetViewAssignment>,
    pub global_options: Vec<GlobalOption>,
}

#[derive(Clone)]
pub struct MockModelProvider {
    model: Arc<RwLock<Model>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockModelProvider {
    pub fn new() -> Self {
        Self::with_model(Model::default())
    }

    pub fn with_model(model: Model) -> Self {
        Self {
            model: Arc::new(RwLock::new(model)),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Applies `change` to the stored model.
    pub async fn update(&self, change: impl FnOnce(&mut Model)) {
        change(&mut *self.model.write().await);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    async fn read(&self) -> Result<tokio::sync::RwLockReadGuard<'_, Model>, DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::DatabaseError(
                "Mock provider failed".to_string(),
            ));
        }
        Ok(self.model.read().await)
    }
}

impl Default for MockModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn list_views(&self) -> Result<Vec<View>, DomainError> {
        Ok(self.read().await?.views.clone())
    }

    async fn list_zones(&self, view: Option<&ViewScope>) -> Result<Vec<Zone>, DomainError> {
        Ok(self
            .read()
            .await?
            .zones
            .iter()
            .filter(|z| view.map_or(true, |v| &z.view == v))
            .cloned()
            .collect())
    }

    async fn list_records(
        &self,
        zone: &str,
        view: &ViewScope,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        Ok(self
            .read()
            .await?
            .records
            .iter()
            .filter(|r| r.zone.as_ref() == zone && &r.view == view)
            .cloned()
            .collect())
    }

    async fn list_acls(&self) -> Result<Vec<Acl>, DomainError> {
        Ok(self.read().await?.acls.clone())
    }

    async fn list_view_acl_assignments(&self) -> Result<Vec<ViewAclAssignment>, DomainError> {
        Ok(self.read().await?.view_acl_assignments.clone())
    }

    async fn list_dns_servers(&self) -> Result<Vec<DnsServer>, DomainError> {
        Ok(self.read().await?.servers.clone())
    }

    async fn list_server_sets(&self) -> Result<Vec<DnsServerSet>, DomainError> {
        Ok(self.read().await?.server_sets.clone())
    }

    async fn list_server_set_assignments(&self) -> Result<Vec<ServerSetAssignment>, DomainError> {
        Ok(self.read().await?.server_set_assignments.clone())
    }

    async fn list_server_set_view_assignments(
        &self,
    ) -> Result<Vec<ServerSetViewAssignment>, DomainError> {
        Ok(self.read().await?.server_set_view_assignments.clone())
    }

    async fn list_global_options(
        &self,
        server_set: &str,
    ) -> Result<Vec<GlobalOption>, DomainError> {
        Ok(self
            .read()
            .await?
            .global_options
            .iter()
            .filter(|o| o.server_set.as_ref() == server_set)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-memory TreeStore
// ============================================================================

/// Archive contents keyed by `<set>_servers/<relative path>`.
pub type ArchiveFiles = BTreeMap<String, String>;

#[derive(Clone, Default)]
pub struct MemoryTreeStore {
    current: Arc<RwLock<BTreeMap<Arc<str>, RenderedTree>>>,
    backup: Arc<RwLock<BTreeMap<Arc<str>, RenderedTree>>>,
    archives: Arc<RwLock<Vec<ArchiveFiles>>>,
    failing_sets: Arc<RwLock<HashSet<String>>>,
    fail_packaging: Arc<RwLock<bool>>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_writes_for(&self, server_set: &str) {
        self.failing_sets
            .write()
            .await
            .insert(server_set.to_string());
    }

    pub async fn set_fail_packaging(&self, fail: bool) {
        *self.fail_packaging.write().await = fail;
    }

    pub async fn current(&self, server_set: &str) -> Option<RenderedTree> {
        self.current.read().await.get(server_set).cloned()
    }

    pub async fn backup(&self, server_set: &str) -> Option<RenderedTree> {
        self.backup.read().await.get(server_set).cloned()
    }

    pub async fn current_file(&self, server_set: &str, relative_path: &str) -> Option<String> {
        self.current(server_set).await.and_then(|tree| {
            tree.files
                .into_iter()
                .find(|f| f.relative_path == relative_path)
                .map(|f| f.contents)
        })
    }

    pub async fn archive_count(&self) -> usize {
        self.archives.read().await.len()
    }

    pub async fn archive(&self, iteration: IterationId) -> Option<ArchiveFiles> {
        let index = usize::try_from(iteration.0).ok()?.checked_sub(1)?;
        self.archives.read().await.get(index).cloned()
    }

    /// Replaces `from` by `to` in one member of a stored archive.
    pub async fn edit_archive(&self, iteration: IterationId, member: &str, from: &str, to: &str) {
        let index = iteration.0 as usize - 1;
        let mut archives = self.archives.write().await;
        let contents = archives[index]
            .get_mut(member)
            .unwrap_or_else(|| panic!("no archive member {member}"));
        assert!(contents.contains(from), "{member} does not contain {from:?}");
        *contents = contents.replace(from, to);
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn replace_server_set(&self, tree: &RenderedTree) -> Result<(), DomainError> {
        if self.failing_sets.read().await.contains(tree.server_set.as_ref()) {
            return Err(DomainError::IoError(format!(
                "Mock write failure for {}",
                tree.server_set
            )));
        }

        let mut current = self.current.write().await;
        if let Some(previous) = current.insert(Arc::clone(&tree.server_set), tree.clone()) {
            self.backup
                .write()
                .await
                .insert(Arc::clone(&tree.server_set), previous);
        }
        Ok(())
    }

    async fn retire_server_sets(&self, keep: &[Arc<str>]) -> Result<Vec<Arc<str>>, DomainError> {
        let mut current = self.current.write().await;
        let retired: Vec<Arc<str>> = current
            .keys()
            .filter(|set| !keep.contains(*set))
            .cloned()
            .collect();

        let mut backup = self.backup.write().await;
        for set in &retired {
            if let Some(tree) = current.remove(set) {
                backup.insert(Arc::clone(set), tree);
            }
        }
        Ok(retired)
    }

    async fn package(&self) -> Result<PackagedArchive, DomainError> {
        if *self.fail_packaging.read().await {
            return Err(DomainError::PackagingError(
                "Mock packaging failure".to_string(),
            ));
        }

        let mut files = ArchiveFiles::new();
        for (set, tree) in self.current.read().await.iter() {
            for file in &tree.files {
                files.insert(
                    format!("{}/{}", server_set_directory(set), file.relative_path),
                    file.contents.clone(),
                );
            }
        }

        let mut archives = self.archives.write().await;
        archives.push(files);
        let iteration = IterationId(archives.len() as u64);

        Ok(PackagedArchive {
            iteration,
            path: PathBuf::from("dns_archives").join(iteration.archive_file_name()),
        })
    }
}

// ============================================================================
// Fake PackageStager over MemoryTreeStore
// ============================================================================

#[derive(Clone)]
pub struct FakeStager {
    store: MemoryTreeStore,
    staged: Arc<RwLock<ArchiveFiles>>,
}

impl FakeStager {
    pub fn new(store: MemoryTreeStore) -> Self {
        Self {
            store,
            staged: Arc::new(RwLock::new(ArchiveFiles::new())),
        }
    }

    /// Contents of a staged file by its path relative to the staging root.
    pub async fn staged_file(&self, path: &Path) -> Option<String> {
        let member = path.strip_prefix(STAGE_DIR).ok()?.to_str()?.to_string();
        self.staged.read().await.get(&member).cloned()
    }
}

#[async_trait]
impl PackageStager for FakeStager {
    async fn stage(&self, iteration: Option<IterationId>) -> Result<StagedPackage, DomainError> {
        let iteration = match iteration {
            Some(iteration) => iteration,
            None => match self.store.archive_count().await {
                0 => return Err(DomainError::NotFound("No archives".to_string())),
                n => IterationId(n as u64),
            },
        };
        let files = self.store.archive(iteration).await.ok_or_else(|| {
            DomainError::NotFound(format!("Archive {} not found", iteration))
        })?;

        let mut server_sets = Vec::new();
        for (member, contents) in &files {
            let Some(directory) = member.strip_suffix("/named.conf") else {
                continue;
            };
            let Some(name) = server_set_from_directory(directory) else {
                continue;
            };
            server_sets.push(StagedServerSet {
                name: Arc::from(name),
                directory: Path::new(STAGE_DIR).join(directory),
                service_config: contents.clone(),
            });
        }

        *self.staged.write().await = files;
        Ok(StagedPackage::new(
            iteration,
            PathBuf::from("stage"),
            server_sets,
            (),
        ))
    }
}

// ============================================================================
// Fake ConfigChecker
// ============================================================================

const KNOWN_TYPES: &[&str] = &[
    "soa", "ns", "mx", "txt", "a", "aaaa", "cname", "ptr", "hinfo", "srv",
];
const KNOWN_ZONE_TYPES: &[&str] = &["master", "slave", "hint", "stub"];

/// Checker double.
///
/// Scripted results win; otherwise, when built with [`FakeChecker::emulating`],
/// it inspects the staged files and answers in the BIND tools' format.
#[derive(Clone)]
pub struct FakeChecker {
    stager: Option<FakeStager>,
    scripted: Arc<RwLock<HashMap<PathBuf, Result<CheckOutput, DomainError>>>>,
    calls: Arc<RwLock<Vec<CheckTarget>>>,
}

impl FakeChecker {
    /// Answers every check with silence unless scripted.
    pub fn silent() -> Self {
        Self {
            stager: None,
            scripted: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn emulating(stager: FakeStager) -> Self {
        Self {
            stager: Some(stager),
            ..Self::silent()
        }
    }

    pub async fn script(&self, path: &str, result: Result<CheckOutput, DomainError>) {
        self.scripted
            .write()
            .await
            .insert(PathBuf::from(path), result);
    }

    pub async fn calls(&self) -> Vec<CheckTarget> {
        self.calls.read().await.clone()
    }

    async fn emulate(&self, target: &CheckTarget) -> CheckOutput {
        let Some(stager) = &self.stager else {
            return CheckOutput::clean();
        };
        let path = target.path();
        let Some(contents) = stager.staged_file(path).await else {
            return CheckOutput {
                output: format!("open: {}: file not found\n", path.display()),
                exit_code: Some(1),
            };
        };

        let mut output = String::new();
        match target {
            CheckTarget::ServiceConfig { .. } => {
                for (index, line) in contents.lines().enumerate() {
                    let Some(value) = line.trim().strip_prefix("type ") else {
                        continue;
                    };
                    let value = value.trim_end_matches(';');
                    if !KNOWN_ZONE_TYPES.contains(&value) {
                        output.push_str(&format!(
                            "{}:{}: '{}' unexpected\n",
                            path.display(),
                            index + 1,
                            value
                        ));
                    }
                }
            }
            CheckTarget::Zone { zone, .. } => {
                for (index, line) in contents.lines().enumerate().skip(2) {
                    let Some(record_type) = line.split_whitespace().nth(3) else {
                        continue;
                    };
                    if !KNOWN_TYPES.contains(&record_type) {
                        output.push_str(&format!(
                            "{}:{}: unknown RR type '{}'\n\
                             zone {}/IN: loading from master file {} failed: unknown class/type\n",
                            path.display(),
                            index + 1,
                            record_type,
                            zone,
                            path.display()
                        ));
                    }
                }
            }
        }

        CheckOutput {
            exit_code: Some(if output.is_empty() { 0 } else { 1 }),
            output,
        }
    }
}

#[async_trait]
impl ConfigChecker for FakeChecker {
    async fn check(
        &self,
        _working_dir: &Path,
        target: &CheckTarget,
    ) -> Result<CheckOutput, DomainError> {
        self.calls.write().await.push(target.clone());

        if let Some(result) = self.scripted.read().await.get(target.path()) {
            return result.clone();
        }
        Ok(self.emulate(target).await)
    }
}
