use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{ExportState, IterationId, ZoneType};

/// What an external checker is asked to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTarget {
    ServiceConfig {
        path: PathBuf,
    },
    Zone {
        path: PathBuf,
        zone: Arc<str>,
        origin: Arc<str>,
        zone_type: ZoneType,
    },
}

impl CheckTarget {
    pub fn path(&self) -> &PathBuf {
        match self {
            CheckTarget::ServiceConfig { path } | CheckTarget::Zone { path, .. } => path,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CheckTarget::ServiceConfig { path } => format!("config {}", path.display()),
            CheckTarget::Zone { path, zone, .. } => {
                format!("zone {} ({})", zone, path.display())
            }
        }
    }
}

/// Combined stdout/stderr of one checker run plus its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    pub output: String,
    pub exit_code: Option<i32>,
}

impl CheckOutput {
    pub fn clean() -> Self {
        Self {
            output: String::new(),
            exit_code: Some(0),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.trim().is_empty()
    }

    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Verbatim output of an external checker.
    Diagnostic { target: String, text: String },
    /// The checker could not run to completion.
    ToolFailure { target: String, message: String },
}

impl Finding {
    /// Operator-facing text. Diagnostics keep the tool's own lines untouched.
    pub fn render(&self) -> String {
        match self {
            Finding::Diagnostic { text, .. } => {
                let mut rendered = format!("ERROR: {}", text);
                if !rendered.ends_with('\n') {
                    rendered.push('\n');
                }
                rendered
            }
            Finding::ToolFailure { target, message } => {
                format!("CHECKER FAILURE: {}: {}\n", target, message)
            }
        }
    }

    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Finding::ToolFailure { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerSetValidation {
    pub server_set: Arc<str>,
    pub state: ExportState,
    pub findings: Vec<Finding>,
}

/// Result of one `Validate` call.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub iteration: IterationId,
    pub server_sets: Vec<ServerSetValidation>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.server_sets
            .iter()
            .all(|set| set.state == ExportState::Valid)
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.server_sets.iter().flat_map(|set| set.findings.iter())
    }

    /// Each finding followed by a blank line; empty when everything is valid.
    pub fn render(&self) -> String {
        self.findings()
            .map(|finding| format!("{}\n", finding.render()))
            .collect()
    }
}
