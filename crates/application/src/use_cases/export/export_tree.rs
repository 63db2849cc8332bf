use chrono::Utc;
use dnstree_domain::config::ExporterConfig;
use dnstree_domain::{
    DnsServerSet, DomainError, ExportState, ExportSummary, RenderedFile, RenderedTree,
    ResourceRecord, ServerSetOutcome, ViewScope, Zone, ZoneType,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::ports::{ModelProvider, TreeStore};
use crate::services::{ModelSnapshot, NamedConfRenderer, ServerSetPlan, ZoneRenderer};

/// Knobs of an export run.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub named_dir: String,
    pub soa_required_zone_types: Vec<ZoneType>,
    pub max_parallel_exports: usize,
}

impl From<&ExporterConfig> for ExportSettings {
    fn from(config: &ExporterConfig) -> Self {
        Self {
            named_dir: config.named_dir.clone(),
            soa_required_zone_types: config.soa_required_zone_types.clone(),
            max_parallel_exports: config.max_parallel_exports,
        }
    }
}

/// Renders server sets into the export root and packages the result.
///
/// Each server set is an independent unit: a model error in one set aborts
/// that set only, and its previous tree stays in place.
pub struct ExportTreeUseCase {
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn TreeStore>,
    zone_renderer: ZoneRenderer,
    conf_renderer: NamedConfRenderer,
    max_parallel: usize,
}

impl ExportTreeUseCase {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        store: Arc<dyn TreeStore>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            provider,
            store,
            zone_renderer: ZoneRenderer::new(settings.soa_required_zone_types),
            conf_renderer: NamedConfRenderer::new(settings.named_dir),
            max_parallel: settings.max_parallel_exports.max(1),
        }
    }

    /// Exports every server set of the model.
    ///
    /// # Returns
    ///
    /// * `Ok(ExportSummary)` - The archive written, with one outcome per
    ///   server set; failed sets carry their error and state `Aborted`
    ///
    /// # Errors
    ///
    /// * `DomainError::DatabaseError` - If the model cannot be read
    /// * `DomainError::IoError` / `DomainError::PackagingError` - If the
    ///   archive cannot be written, or the tree of a set no longer in the
    ///   model cannot be moved to the backup location
    #[instrument(skip(self))]
    pub async fn export_all(&self) -> Result<ExportSummary, DomainError> {
        let snapshot = ModelSnapshot::load(self.provider.as_ref()).await?;

        let outcomes: Vec<ServerSetOutcome> = stream::iter(snapshot.server_sets.iter())
            .map(|set| self.export_set(&snapshot, set))
            .buffered(self.max_parallel)
            .collect()
            .await;

        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        if failed > 0 {
            warn!(
                failed = failed,
                total = outcomes.len(),
                "Some server sets were not exported"
            );
        }

        self.package(&snapshot, outcomes).await
    }

    /// Exports a single server set.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no server set is called `name`
    /// * Any model inconsistency or I/O error of that set
    #[instrument(skip(self))]
    pub async fn export_one(&self, name: &str) -> Result<ExportSummary, DomainError> {
        let snapshot = ModelSnapshot::load(self.provider.as_ref()).await?;
        let set = snapshot
            .server_set(name)
            .ok_or_else(|| DomainError::NotFound(format!("Server set {} not found", name)))?;

        let (servers, state, result) = self.export_plan(&snapshot, set).await;
        let files_written = result?;

        self.package(
            &snapshot,
            vec![ServerSetOutcome {
                server_set: Arc::clone(&set.name),
                servers,
                state,
                files_written,
                error: None,
            }],
        )
        .await
    }

    /// Retires directories of sets missing from `snapshot`, then packages.
    async fn package(
        &self,
        snapshot: &ModelSnapshot,
        mut outcomes: Vec<ServerSetOutcome>,
    ) -> Result<ExportSummary, DomainError> {
        let known: Vec<Arc<str>> = snapshot
            .server_sets
            .iter()
            .map(|set| Arc::clone(&set.name))
            .collect();
        let retired = self.store.retire_server_sets(&known).await?;

        let archive = self.store.package().await?;

        for outcome in outcomes.iter_mut().filter(|o| o.error.is_none()) {
            outcome.state = outcome.state.transition(ExportState::Packaged)?;
        }

        info!(
            iteration = %archive.iteration,
            archive = %archive.path.display(),
            server_sets = outcomes.len(),
            retired = retired.len(),
            "Export packaged"
        );

        Ok(ExportSummary {
            iteration: archive.iteration,
            archive: archive.path,
            exported_at: Utc::now(),
            outcomes,
        })
    }

    async fn export_set(&self, snapshot: &ModelSnapshot, set: &DnsServerSet) -> ServerSetOutcome {
        let (servers, state, result) = self.export_plan(snapshot, set).await;

        match result {
            Ok(files_written) => ServerSetOutcome {
                server_set: Arc::clone(&set.name),
                servers,
                state,
                files_written,
                error: None,
            },
            Err(e) => {
                error!(server_set = %set.name, error = %e, "Server set export aborted");
                ServerSetOutcome {
                    server_set: Arc::clone(&set.name),
                    servers,
                    state,
                    files_written: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Plans, renders and writes one set.
    ///
    /// Returns the set's member servers (empty when planning failed), the
    /// state reached (`Rendered` on success, `Aborted` otherwise) and the
    /// number of files written.
    async fn export_plan(
        &self,
        snapshot: &ModelSnapshot,
        set: &DnsServerSet,
    ) -> (Vec<Arc<str>>, ExportState, Result<usize, DomainError>) {
        let mut state = ExportState::Pending;

        let plan = match snapshot.plan(set) {
            Ok(plan) => plan,
            Err(e) => return (Vec::new(), ExportState::Aborted, Err(e)),
        };
        let servers = plan.servers.clone();

        let tree = match self.render(&plan).await {
            Ok(tree) => tree,
            Err(e) => return (servers, ExportState::Aborted, Err(e)),
        };
        if let Ok(next) = state.transition(ExportState::Rendered) {
            state = next;
        }

        if let Err(e) = self.store.replace_server_set(&tree).await {
            return (servers, ExportState::Aborted, Err(e));
        }

        info!(
            server_set = %plan.server_set,
            views = plan.views.len(),
            files = tree.files.len(),
            "Server set exported"
        );
        (servers, state, Ok(tree.files.len()))
    }

    async fn render(&self, plan: &ServerSetPlan) -> Result<RenderedTree, DomainError> {
        let global_options = self.provider.list_global_options(&plan.server_set).await?;

        let mut files = vec![RenderedFile::new(
            "named.conf",
            self.conf_renderer.render(plan, &global_options),
        )];

        for view in plan.views.iter() {
            for zone in &view.zones {
                let records = self.zone_records(zone, &view.name).await?;
                let text = self.zone_renderer.render(zone, &view.name, &records)?;
                files.push(RenderedFile::new(zone.file_path(&view.name), text));
            }
        }

        Ok(RenderedTree {
            server_set: Arc::clone(&plan.server_set),
            files,
        })
    }

    /// Records of `zone` as seen from `view`: the view's own plus the
    /// wildcard ones.
    async fn zone_records(
        &self,
        zone: &Zone,
        view: &Arc<str>,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        let concrete = ViewScope::Concrete(Arc::clone(view));
        let (mut records, wildcard) = futures::try_join!(
            self.provider.list_records(&zone.name, &concrete),
            self.provider.list_records(&zone.name, &ViewScope::AnyView),
        )?;
        records.extend(wildcard);
        Ok(records)
    }
}
