use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::Arc;

use crate::{DomainError, ViewScope};

/// Record-type tags as stored in the model and written to zone files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Soa,
    Ns,
    Mx,
    Txt,
    A,
    Aaaa,
    Cname,
    Ptr,
    Hinfo,
    Srv,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Soa => "soa",
            RecordType::Ns => "ns",
            RecordType::Mx => "mx",
            RecordType::Txt => "txt",
            RecordType::A => "a",
            RecordType::Aaaa => "aaaa",
            RecordType::Cname => "cname",
            RecordType::Ptr => "ptr",
            RecordType::Hinfo => "hinfo",
            RecordType::Srv => "srv",
        }
    }

    /// Position of this type in a rendered zone file. SOA always comes first.
    pub fn render_rank(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soa" => Ok(RecordType::Soa),
            "ns" => Ok(RecordType::Ns),
            "mx" => Ok(RecordType::Mx),
            "txt" => Ok(RecordType::Txt),
            "a" => Ok(RecordType::A),
            "aaaa" => Ok(RecordType::Aaaa),
            "cname" => Ok(RecordType::Cname),
            "ptr" => Ok(RecordType::Ptr),
            "hinfo" => Ok(RecordType::Hinfo),
            "srv" => Ok(RecordType::Srv),
            _ => Err(format!("Unknown record type: {}", s)),
        }
    }
}

/// Start-of-authority fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaData {
    pub name_server: Arc<str>,
    pub admin_email: Arc<str>,
    pub serial_number: u32,
    pub refresh_seconds: u32,
    pub retry_seconds: u32,
    pub expiry_seconds: u32,
    pub minimum_seconds: u32,
}

/// Type-specific record fields.
///
/// Text fields are kept exactly as stored; TXT content keeps its own quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordData {
    Soa(SoaData),
    Ns { name_server: Arc<str> },
    Mx { priority: u16, mail_server: Arc<str> },
    Txt { quoted_text: Arc<str> },
    A { assignment_ip: Ipv4Addr },
    Aaaa { assignment_ip: Ipv6Addr },
    Cname { assignment_host: Arc<str> },
    Ptr { assignment_host: Arc<str> },
    Hinfo { hardware: Arc<str>, os: Arc<str> },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        assignment_host: Arc<str>,
    },
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::Soa(_) => RecordType::Soa,
            RecordData::Ns { .. } => RecordType::Ns,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Txt { .. } => RecordType::Txt,
            RecordData::A { .. } => RecordType::A,
            RecordData::Aaaa { .. } => RecordType::Aaaa,
            RecordData::Cname { .. } => RecordType::Cname,
            RecordData::Ptr { .. } => RecordType::Ptr,
            RecordData::Hinfo { .. } => RecordType::Hinfo,
            RecordData::Srv { .. } => RecordType::Srv,
        }
    }

    /// The rdata portion of a master-file line. Numbers are plain decimals.
    pub fn rdata(&self) -> String {
        match self {
            RecordData::Soa(soa) => format!(
                "{} {} {} {} {} {} {}",
                soa.name_server,
                soa.admin_email,
                soa.serial_number,
                soa.refresh_seconds,
                soa.retry_seconds,
                soa.expiry_seconds,
                soa.minimum_seconds
            ),
            RecordData::Ns { name_server } => name_server.to_string(),
            RecordData::Mx {
                priority,
                mail_server,
            } => format!("{} {}", priority, mail_server),
            RecordData::Txt { quoted_text } => quoted_text.to_string(),
            RecordData::A { assignment_ip } => assignment_ip.to_string(),
            RecordData::Aaaa { assignment_ip } => assignment_ip.to_string(),
            RecordData::Cname { assignment_host } | RecordData::Ptr { assignment_host } => {
                assignment_host.to_string()
            }
            RecordData::Hinfo { hardware, os } => format!("{} {}", hardware, os),
            RecordData::Srv {
                priority,
                weight,
                port,
                assignment_host,
            } => format!("{} {} {} {}", priority, weight, port, assignment_host),
        }
    }

    /// Builds typed record data from the keyed arguments the model stores.
    pub fn from_arguments(
        record_type: RecordType,
        args: &BTreeMap<String, String>,
    ) -> Result<Self, String> {
        let text = |key: &str| -> Result<Arc<str>, String> {
            args.get(key)
                .map(|v| Arc::from(v.as_str()))
                .ok_or_else(|| format!("missing argument '{key}'"))
        };
        let number = |key: &str| -> Result<u32, String> {
            args.get(key)
                .ok_or_else(|| format!("missing argument '{key}'"))?
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("argument '{key}' is not a number: {e}"))
        };
        let port = |key: &str| -> Result<u16, String> {
            let value = number(key)?;
            u16::try_from(value).map_err(|_| format!("argument '{key}' out of range: {value}"))
        };

        let data = match record_type {
            RecordType::Soa => RecordData::Soa(SoaData {
                name_server: text("name_server")?,
                admin_email: text("admin_email")?,
                serial_number: number("serial_number")?,
                refresh_seconds: number("refresh_seconds")?,
                retry_seconds: number("retry_seconds")?,
                expiry_seconds: number("expiry_seconds")?,
                minimum_seconds: number("minimum_seconds")?,
            }),
            RecordType::Ns => RecordData::Ns {
                name_server: text("name_server")?,
            },
            RecordType::Mx => RecordData::Mx {
                priority: port("priority")?,
                mail_server: text("mail_server")?,
            },
            RecordType::Txt => RecordData::Txt {
                quoted_text: text("quoted_text")?,
            },
            RecordType::A => RecordData::A {
                assignment_ip: text("assignment_ip")?
                    .parse()
                    .map_err(|e| format!("invalid IPv4 address: {e}"))?,
            },
            RecordType::Aaaa => RecordData::Aaaa {
                assignment_ip: text("assignment_ip")?
                    .parse()
                    .map_err(|e| format!("invalid IPv6 address: {e}"))?,
            },
            RecordType::Cname => RecordData::Cname {
                assignment_host: text("assignment_host")?,
            },
            RecordType::Ptr => RecordData::Ptr {
                assignment_host: text("assignment_host")?,
            },
            RecordType::Hinfo => RecordData::Hinfo {
                hardware: text("hardware")?,
                os: text("os")?,
            },
            RecordType::Srv => RecordData::Srv {
                priority: port("priority")?,
                weight: port("weight")?,
                port: port("port")?,
                assignment_host: text("assignment_host")?,
            },
        };

        Ok(data)
    }
}

/// One resource record of a (zone, view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub zone: Arc<str>,
    pub view: ViewScope,
    /// Owner label relative to the zone origin (`@`, `www`, ...).
    pub target: Arc<str>,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(zone: &str, view: ViewScope, target: &str, ttl: u32, data: RecordData) -> Self {
        Self {
            zone: Arc::from(zone),
            view,
            target: Arc::from(target),
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    pub fn is_soa(&self) -> bool {
        matches!(self.data, RecordData::Soa(_))
    }

    /// `<owner> <ttl> in <type> <rdata...>`
    pub fn to_master_line(&self) -> String {
        format!(
            "{} {} in {} {}",
            self.target,
            self.ttl,
            self.record_type(),
            self.data.rdata()
        )
    }

    pub fn validate_target(&self) -> Result<(), DomainError> {
        if self.target.is_empty() || self.target.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRecord {
                zone: self.zone.to_string(),
                record: self.to_master_line(),
                reason: "owner label must be a single non-empty token".to_string(),
            });
        }
        Ok(())
    }
}
