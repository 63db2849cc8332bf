use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::DomainError;

/// Identifier of one export cycle's packaged archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IterationId(pub u64);

impl IterationId {
    pub const FIRST: IterationId = IterationId(1);

    pub fn next(self) -> Self {
        IterationId(self.0 + 1)
    }

    pub fn archive_file_name(&self) -> String {
        format!("dns_tree-{}.tar", self.0)
    }

    /// Parses `dns_tree-<n>.tar`; anything else is not an archive of ours.
    pub fn from_archive_file_name(name: &str) -> Option<Self> {
        name.strip_prefix("dns_tree-")?
            .strip_suffix(".tar")?
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .map(IterationId)
    }
}

impl fmt::Display for IterationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IterationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(n) if n > 0 => Ok(IterationId(n)),
            _ => Err(format!("Invalid iteration: {}", s)),
        }
    }
}

/// Lifecycle of one server set through an export/validate attempt.
///
/// `Pending -> Rendered -> Packaged -> Validating -> {Valid | Invalid}`.
/// `Aborted` ends an attempt whose render or write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    Pending,
    Rendered,
    Packaged,
    Validating,
    Valid,
    Invalid,
    Aborted,
}

impl ExportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportState::Pending => "pending",
            ExportState::Rendered => "rendered",
            ExportState::Packaged => "packaged",
            ExportState::Validating => "validating",
            ExportState::Valid => "valid",
            ExportState::Invalid => "invalid",
            ExportState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportState::Valid | ExportState::Invalid | ExportState::Aborted
        )
    }

    pub fn can_transition_to(&self, next: ExportState) -> bool {
        use ExportState::*;
        matches!(
            (self, next),
            (Pending, Rendered)
                | (Rendered, Packaged)
                | (Packaged, Validating)
                | (Validating, Valid)
                | (Validating, Invalid)
                | (Pending, Aborted)
                | (Rendered, Aborted)
        )
    }

    pub fn transition(self, next: ExportState) -> Result<ExportState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file produced by the renderers, relative to its server-set directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub relative_path: String,
    pub contents: String,
}

impl RenderedFile {
    pub fn new(relative_path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents: contents.into(),
        }
    }
}

/// Every file of one server set's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTree {
    pub server_set: Arc<str>,
    pub files: Vec<RenderedFile>,
}

/// Archive written by one export cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedArchive {
    pub iteration: IterationId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerSetOutcome {
    pub server_set: Arc<str>,
    pub servers: Vec<Arc<str>>,
    pub state: ExportState,
    pub files_written: usize,
    pub error: Option<String>,
}

impl ServerSetOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.state == ExportState::Packaged
    }
}

/// Result of `ExportOne` / `ExportAll`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub iteration: IterationId,
    pub archive: PathBuf,
    pub exported_at: DateTime<Utc>,
    pub outcomes: Vec<ServerSetOutcome>,
}

impl ExportSummary {
    pub fn failed(&self) -> impl Iterator<Item = &ServerSetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}
