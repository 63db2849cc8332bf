use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A physical or logical name-server instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServer {
    pub name: Arc<str>,
}

/// A named group of servers sharing one generated configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServerSet {
    pub name: Arc<str>,
}

impl DnsServerSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }

    /// Directory holding this set's tree under the export root.
    pub fn directory_name(&self) -> String {
        server_set_directory(&self.name)
    }
}

pub fn server_set_directory(server_set: &str) -> String {
    format!("{}_servers", server_set)
}

/// Inverse of [`server_set_directory`].
pub fn server_set_from_directory(directory: &str) -> Option<&str> {
    directory
        .strip_suffix("_servers")
        .filter(|name| !name.is_empty())
}

/// Membership of a server in a server set (many-to-many).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSetAssignment {
    pub server: Arc<str>,
    pub server_set: Arc<str>,
}

/// Placement of a view in a server set's config, with its precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSetViewAssignment {
    pub server_set: Arc<str>,
    pub view: Arc<str>,
    pub order: u32,
    /// Freeform fragment injected into the view clause.
    pub options: Arc<str>,
}

/// ACL placed in a view's `match-clients` list for one server set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAclAssignment {
    pub view: Arc<str>,
    pub server_set: Arc<str>,
    pub acl: Arc<str>,
    pub order: u32,
}

/// Block of text injected verbatim near the top of a service config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOption {
    pub server_set: Arc<str>,
    pub label: Arc<str>,
    pub options: Arc<str>,
}
