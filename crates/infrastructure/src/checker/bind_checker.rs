use async_trait::async_trait;
use dnstree_application::ports::ConfigChecker;
use dnstree_domain::{CheckOutput, CheckTarget, DomainError};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Runs `named-checkconf` and `named-checkzone` as child processes.
pub struct BindConfigChecker {
    named_checkconf: String,
    named_checkzone: String,
    timeout: Duration,
}

impl BindConfigChecker {
    pub fn new(
        named_checkconf: impl Into<String>,
        named_checkzone: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            named_checkconf: named_checkconf.into(),
            named_checkzone: named_checkzone.into(),
            timeout,
        }
    }

    fn invocation<'a>(&'a self, target: &CheckTarget) -> (&'a str, Vec<OsString>) {
        match target {
            CheckTarget::ServiceConfig { path } => {
                (self.named_checkconf.as_str(), vec![path.clone().into_os_string()])
            }
            CheckTarget::Zone { path, origin, .. } => (
                self.named_checkzone.as_str(),
                vec![
                    OsString::from(origin.as_ref()),
                    path.clone().into_os_string(),
                ],
            ),
        }
    }
}

#[async_trait]
impl ConfigChecker for BindConfigChecker {
    #[instrument(skip(self, working_dir), fields(check = %target.describe()))]
    async fn check(
        &self,
        working_dir: &Path,
        target: &CheckTarget,
    ) -> Result<CheckOutput, DomainError> {
        let (tool, args) = self.invocation(target);

        let child = Command::new(tool)
            .args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::CheckerUnavailable {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(crashed(tool, e)),
            Err(_) => {
                return Err(DomainError::CheckerTimeout {
                    tool: tool.to_string(),
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let exit_code = output.status.code();
        if exit_code == Some(0) {
            text = strip_success_banner(&text);
        }
        debug!(?exit_code, bytes = text.len(), "Checker finished");

        Ok(CheckOutput {
            output: text,
            exit_code,
        })
    }
}

fn crashed(tool: &str, e: io::Error) -> DomainError {
    DomainError::CheckerCrashed {
        tool: tool.to_string(),
        reason: e.to_string(),
    }
}

/// `named-checkzone` reports a clean load as `zone X/IN: loaded serial N`
/// followed by `OK`. Only those lines are dropped; anything else a
/// successful run prints is kept as a diagnostic.
fn strip_success_banner(output: &str) -> String {
    output
        .lines()
        .filter(|line| {
            let line = line.trim();
            !(line == "OK" || (line.starts_with("zone ") && line.contains(": loaded serial ")))
        })
        .map(|line| format!("{}\n", line))
        .collect()
}
