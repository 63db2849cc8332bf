use dnstree_application::use_cases::{CheckConfigUseCase, ExportSettings, ExportTreeUseCase};
use dnstree_domain::Config;
use std::sync::Arc;

use super::Repositories;

pub struct UseCases {
    pub export: Option<Arc<ExportTreeUseCase>>,
    pub check: Arc<CheckConfigUseCase>,
}

impl UseCases {
    pub fn new(repos: &Repositories, config: &Config) -> Self {
        Self {
            export: repos.model.as_ref().map(|model| {
                Arc::new(ExportTreeUseCase::new(
                    model.clone(),
                    repos.tree_store.clone(),
                    ExportSettings::from(&config.exporter),
                ))
            }),
            check: Arc::new(CheckConfigUseCase::new(
                repos.stager.clone(),
                repos.checker.clone(),
                config.exporter.named_dir.clone(),
                config.checker.max_parallel_checks,
            )),
        }
    }
}
