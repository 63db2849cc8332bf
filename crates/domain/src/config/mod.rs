//! Configuration module for dnstree
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `exporter`: Export tree, backup and archive locations
//! - `checker`: External name-server checking tools
//! - `logging`: Logging settings
//! - `database`: Model database location
//! - `errors`: Configuration errors

pub mod checker;
pub mod database;
pub mod errors;
pub mod exporter;
pub mod logging;
pub mod root;

pub use checker::CheckerConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use exporter::ExporterConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
