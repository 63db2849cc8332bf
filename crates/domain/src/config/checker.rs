use serde::{Deserialize, Serialize};

/// External name-server checking tools
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// Service-config syntax checker
    #[serde(default = "default_named_checkconf")]
    pub named_checkconf: String,

    /// Zone file checker
    #[serde(default = "default_named_checkzone")]
    pub named_checkzone: String,

    /// Per-invocation timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Checker processes running at once (default: 8)
    #[serde(default = "default_max_parallel_checks")]
    pub max_parallel_checks: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            named_checkconf: default_named_checkconf(),
            named_checkzone: default_named_checkzone(),
            timeout_secs: default_timeout_secs(),
            max_parallel_checks: default_max_parallel_checks(),
        }
    }
}

fn default_named_checkconf() -> String {
    "/usr/sbin/named-checkconf".to_string()
}

fn default_named_checkzone() -> String {
    "/usr/sbin/named-checkzone".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_parallel_checks() -> usize {
    8
}
