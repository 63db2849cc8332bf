use dnstree_domain::{
    CheckTarget, DomainError, ExportState, Finding, IterationId, ServerSetValidation,
    ValidationReport, ZoneType,
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::ports::{ConfigChecker, PackageStager, StagedServerSet};
use crate::services::parse_zone_statements;

/// Validates a packaged tree with the external name-server checkers.
///
/// Every server set's `named.conf` is checked, then every zone file it
/// references. All findings are collected before returning; nothing is
/// retried.
pub struct CheckConfigUseCase {
    stager: Arc<dyn PackageStager>,
    checker: Arc<dyn ConfigChecker>,
    named_dir: String,
    permits: Arc<Semaphore>,
}

impl CheckConfigUseCase {
    pub fn new(
        stager: Arc<dyn PackageStager>,
        checker: Arc<dyn ConfigChecker>,
        named_dir: impl Into<String>,
        max_parallel_checks: usize,
    ) -> Self {
        let named_dir: String = named_dir.into();
        Self {
            stager,
            checker,
            named_dir: named_dir.trim_end_matches('/').to_string(),
            permits: Arc::new(Semaphore::new(max_parallel_checks.max(1))),
        }
    }

    /// Stages the archive of `iteration` (newest when `None`) and checks it.
    ///
    /// # Returns
    ///
    /// * `Ok(ValidationReport)` - One entry per server set; an empty set of
    ///   findings means the tree is valid
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If the requested archive does not exist
    /// * `DomainError::PackagingError` - If the archive cannot be unpacked
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        iteration: Option<IterationId>,
    ) -> Result<ValidationReport, DomainError> {
        let staged = self.stager.stage(iteration).await?;
        let root = staged.root();

        let server_sets = join_all(
            staged
                .server_sets
                .iter()
                .map(|set| self.check_server_set(root, set)),
        )
        .await;

        let report = ValidationReport {
            iteration: staged.iteration,
            server_sets,
        };

        let findings = report.findings().count();
        if report.is_success() {
            info!(iteration = %report.iteration, "Configuration tree is valid");
        } else {
            warn!(
                iteration = %report.iteration,
                findings = findings,
                "Configuration tree has errors"
            );
        }

        Ok(report)
    }

    async fn check_server_set(&self, root: &Path, set: &StagedServerSet) -> ServerSetValidation {
        let mut state = ExportState::Packaged;
        if let Ok(next) = state.transition(ExportState::Validating) {
            state = next;
        }

        let service_config = CheckTarget::ServiceConfig {
            path: set.service_config_path(),
        };
        let mut findings: Vec<Finding> = self
            .run(root, &service_config)
            .await
            .into_iter()
            .collect();

        if findings.is_empty() {
            let targets = self.zone_targets(set);
            debug!(server_set = %set.name, zones = targets.len(), "Checking zone files");

            let results = join_all(targets.iter().map(|target| self.run(root, target))).await;
            findings.extend(results.into_iter().flatten());
        } else {
            debug!(server_set = %set.name, "Service config rejected; zone checks skipped");
        }

        let outcome = if findings.is_empty() {
            ExportState::Valid
        } else {
            ExportState::Invalid
        };
        if let Ok(next) = state.transition(outcome) {
            state = next;
        }

        ServerSetValidation {
            server_set: Arc::clone(&set.name),
            state,
            findings,
        }
    }

    /// Zone statements of `set` that name a file and a type the zone checker
    /// understands. Anything else is left to the config checker.
    fn zone_targets(&self, set: &StagedServerSet) -> Vec<CheckTarget> {
        parse_zone_statements(&set.service_config)
            .into_iter()
            .filter_map(|statement| {
                let file = statement.file?;
                let zone_type = match statement.zone_type.as_deref()?.parse::<ZoneType>() {
                    Ok(zone_type) => zone_type,
                    Err(e) => {
                        debug!(zone = %statement.zone, error = %e, "Zone not checked");
                        return None;
                    }
                };
                Some(CheckTarget::Zone {
                    path: self.staged_path(&set.directory, &file),
                    origin: Arc::clone(&statement.zone),
                    zone: statement.zone,
                    zone_type,
                })
            })
            .collect()
    }

    /// Maps a deployed `file` path back into the staged set directory.
    fn staged_path(&self, set_dir: &Path, file: &str) -> PathBuf {
        let deployed = Path::new(file);
        match deployed.strip_prefix(&self.named_dir) {
            Ok(relative) => set_dir.join(relative),
            Err(_) if deployed.is_relative() => set_dir.join(deployed),
            Err(_) => deployed.to_path_buf(),
        }
    }

    async fn run(&self, root: &Path, target: &CheckTarget) -> Option<Finding> {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                return Some(Finding::ToolFailure {
                    target: target.describe(),
                    message: e.to_string(),
                })
            }
        };

        match self.checker.check(root, target).await {
            Ok(output) if !output.is_silent() => Some(Finding::Diagnostic {
                target: target.describe(),
                text: output.output,
            }),
            Ok(output) if !output.exited_cleanly() => Some(Finding::ToolFailure {
                target: target.describe(),
                message: match output.exit_code {
                    Some(code) => format!("exited with status {} and no output", code),
                    None => "terminated by signal".to_string(),
                },
            }),
            Ok(_) => None,
            Err(e) => {
                warn!(check = %target.describe(), error = %e, "Checker failed");
                Some(Finding::ToolFailure {
                    target: target.describe(),
                    message: e.to_string(),
                })
            }
        }
    }
}
