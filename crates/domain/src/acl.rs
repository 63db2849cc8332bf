use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::DomainError;

/// Built-in ACL that matches every client. Never rendered as a definition.
pub const ANY_ACL: &str = "any";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub cidr: IpNetwork,
    pub allowed: bool,
}

impl AclEntry {
    pub fn parse(cidr: &str, allowed: bool) -> Result<Self, DomainError> {
        if !cidr.contains('/') {
            return Err(DomainError::InvalidCidr(format!(
                "{cidr} must include a prefix (e.g., 192.168.1.0/24)"
            )));
        }
        let cidr = cidr
            .parse::<IpNetwork>()
            .map_err(|e| DomainError::InvalidCidr(format!("{cidr}: {e}")))?;
        Ok(Self { cidr, allowed })
    }

    /// Address-match-list element: `192.168.0.0/24` or `!192.168.0.0/24`.
    pub fn to_match_element(&self) -> String {
        if self.allowed {
            self.cidr.to_string()
        } else {
            format!("!{}", self.cidr)
        }
    }
}

/// A named set of client ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub name: Arc<str>,
    pub entries: Vec<AclEntry>,
    /// First stored entry that did not parse.
    #[serde(skip)]
    pub rejected: Option<DomainError>,
}

impl Acl {
    pub fn new(name: &str, entries: Vec<AclEntry>) -> Self {
        Self {
            name: Arc::from(name),
            entries,
            rejected: None,
        }
    }

    /// Adds a stored `(cidr, allowed)` row. A row that does not parse is
    /// remembered and reported by [`Acl::validate`] instead of failing here.
    pub fn push_stored(&mut self, cidr: &str, allowed: bool) {
        match AclEntry::parse(cidr, allowed) {
            Ok(entry) => self.entries.push(entry),
            Err(DomainError::InvalidCidr(reason)) => {
                self.rejected.get_or_insert(DomainError::InvalidCidr(format!(
                    "ACL {}: {}",
                    self.name, reason
                )));
            }
            Err(other) => {
                self.rejected.get_or_insert(other);
            }
        }
    }

    /// # Errors
    ///
    /// * `DomainError::InvalidCidr` - A stored entry of this ACL is not a CIDR block
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.rejected {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
