use dnstree_application::ports::{ConfigChecker, ModelProvider, PackageStager, TreeStore};
use dnstree_domain::Config;
use dnstree_infrastructure::checker::BindConfigChecker;
use dnstree_infrastructure::filesystem::{FsTreeStore, TarPackageStager};
use dnstree_infrastructure::repositories::SqliteModelRepository;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

pub struct Repositories {
    pub model: Option<Arc<dyn ModelProvider>>,
    pub tree_store: Arc<dyn TreeStore>,
    pub stager: Arc<dyn PackageStager>,
    pub checker: Arc<dyn ConfigChecker>,
}

impl Repositories {
    /// `pool` is only needed for exports; validation works from archives.
    pub fn new(config: &Config, pool: Option<SqlitePool>) -> Self {
        let exporter = &config.exporter;
        let checker = &config.checker;

        Self {
            model: pool.map(|pool| {
                Arc::new(SqliteModelRepository::new(pool)) as Arc<dyn ModelProvider>
            }),
            tree_store: Arc::new(FsTreeStore::new(
                &exporter.root_config_dir,
                &exporter.backup_dir,
                &exporter.archive_dir,
            )),
            stager: Arc::new(TarPackageStager::new(&exporter.archive_dir)),
            checker: Arc::new(BindConfigChecker::new(
                checker.named_checkconf.clone(),
                checker.named_checkzone.clone(),
                Duration::from_secs(checker.timeout_secs),
            )),
        }
    }
}
