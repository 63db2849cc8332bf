use serde::{Deserialize, Serialize};

use crate::ZoneType;

/// Where and how configuration trees are exported
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExporterConfig {
    /// Directory holding the current tree, one `<set>_servers` per server set
    #[serde(default = "default_root_config_dir")]
    pub root_config_dir: String,

    /// Directory holding the previous tree of each server set
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    /// Directory receiving one `dns_tree-<iteration>.tar` per export
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Directory of the tree on the deployed name servers, written into
    /// every `file` statement
    #[serde(default = "default_named_dir")]
    pub named_dir: String,

    /// Server sets rendered concurrently (default: 4)
    #[serde(default = "default_max_parallel_exports")]
    pub max_parallel_exports: usize,

    /// Zone types whose zone files must carry an SOA record
    #[serde(default = "default_soa_required")]
    pub soa_required_zone_types: Vec<ZoneType>,
}

impl ExporterConfig {
    pub fn requires_soa(&self, zone_type: ZoneType) -> bool {
        self.soa_required_zone_types.contains(&zone_type)
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            root_config_dir: default_root_config_dir(),
            backup_dir: default_backup_dir(),
            archive_dir: default_archive_dir(),
            named_dir: default_named_dir(),
            max_parallel_exports: default_max_parallel_exports(),
            soa_required_zone_types: default_soa_required(),
        }
    }
}

fn default_root_config_dir() -> String {
    "./dns_tree".to_string()
}

fn default_backup_dir() -> String {
    "./dns_tree_backup".to_string()
}

fn default_archive_dir() -> String {
    "./dns_archives".to_string()
}

fn default_named_dir() -> String {
    "/etc/bind".to_string()
}

fn default_max_parallel_exports() -> usize {
    4
}

fn default_soa_required() -> Vec<ZoneType> {
    vec![ZoneType::Master]
}
