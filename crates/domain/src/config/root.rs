use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{CheckerConfig, ConfigError, DatabaseConfig, ExporterConfig, LoggingConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,

    #[serde(default)]
    pub checker: CheckerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_config_dir: Option<String>,
    pub backup_dir: Option<String>,
    pub archive_dir: Option<String>,
    pub named_dir: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads `config_path` (defaults when `None`) and applies `overrides`.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(dir) = overrides.root_config_dir {
            self.exporter.root_config_dir = dir;
        }
        if let Some(dir) = overrides.backup_dir {
            self.exporter.backup_dir = dir;
        }
        if let Some(dir) = overrides.archive_dir {
            self.exporter.archive_dir = dir;
        }
        if let Some(dir) = overrides.named_dir {
            self.exporter.named_dir = dir;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let exporter = &self.exporter;

        for (name, value) in [
            ("exporter.root_config_dir", &exporter.root_config_dir),
            ("exporter.backup_dir", &exporter.backup_dir),
            ("exporter.archive_dir", &exporter.archive_dir),
            ("exporter.named_dir", &exporter.named_dir),
            ("checker.named_checkconf", &self.checker.named_checkconf),
            ("checker.named_checkzone", &self.checker.named_checkzone),
            ("database.path", &self.database.path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} cannot be empty")));
            }
        }

        let root = exporter.root_config_dir.trim_end_matches('/');
        if root == exporter.backup_dir.trim_end_matches('/') {
            return Err(ConfigError::Invalid(
                "exporter.backup_dir must differ from exporter.root_config_dir".to_string(),
            ));
        }
        if root == exporter.archive_dir.trim_end_matches('/') {
            return Err(ConfigError::Invalid(
                "exporter.archive_dir must differ from exporter.root_config_dir".to_string(),
            ));
        }

        if exporter.max_parallel_exports == 0 {
            return Err(ConfigError::Invalid(
                "exporter.max_parallel_exports must be at least 1".to_string(),
            ));
        }
        if self.checker.max_parallel_checks == 0 {
            return Err(ConfigError::Invalid(
                "checker.max_parallel_checks must be at least 1".to_string(),
            ));
        }
        if self.checker.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "checker.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
