use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{DomainError, ViewScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Master,
    Slave,
    Hint,
    Stub,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Master => "master",
            ZoneType::Slave => "slave",
            ZoneType::Hint => "hint",
            ZoneType::Stub => "stub",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "master" | "primary" => Ok(ZoneType::Master),
            "slave" | "secondary" => Ok(ZoneType::Slave),
            "hint" => Ok(ZoneType::Hint),
            "stub" => Ok(ZoneType::Stub),
            _ => Err(DomainError::InvalidZoneType(s.to_string())),
        }
    }
}

/// A zone as stored for one view (or for every view via `ViewScope::AnyView`).
///
/// The type is kept as stored. A zone whose type does not parse only fails
/// the server sets that can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: Arc<str>,
    pub view: ViewScope,
    /// Fully qualified origin, e.g. `sub.university.edu.`
    pub origin: Arc<str>,
    pub type_name: Arc<str>,
    /// Freeform zone-statement options, injected verbatim.
    pub options: Arc<str>,
}

impl Zone {
    pub fn new(
        name: &str,
        view: ViewScope,
        origin: &str,
        zone_type: ZoneType,
        options: &str,
    ) -> Self {
        Self::from_stored(name, view, origin, zone_type.as_str(), options)
    }

    pub fn from_stored(
        name: &str,
        view: ViewScope,
        origin: &str,
        type_name: &str,
        options: &str,
    ) -> Self {
        Self {
            name: Arc::from(name),
            view,
            origin: Arc::from(origin),
            type_name: Arc::from(type_name),
            options: Arc::from(options),
        }
    }

    pub fn zone_type(&self) -> Result<ZoneType, DomainError> {
        self.type_name.parse::<ZoneType>().map_err(|_| {
            DomainError::InvalidZoneType(format!(
                "{} (zone {} in view {})",
                self.type_name, self.name, self.view
            ))
        })
    }

    /// Same zone with its type spelled canonically (`primary` becomes `master`).
    pub fn with_zone_type(mut self, zone_type: ZoneType) -> Self {
        self.type_name = Arc::from(zone_type.as_str());
        self
    }

    /// Relative path of this zone's file inside a server-set tree.
    pub fn file_path(&self, view: &str) -> String {
        format!("named/{}/{}.db", view, self.name)
    }
}

/// Zones visible from `view`: concrete zones of that view plus wildcard zones
/// whose name is not overridden. Sorted by zone name.
pub fn zones_visible_from<'a>(zones: &'a [Zone], view: &str) -> Vec<&'a Zone> {
    let mut visible: BTreeMap<&str, &Zone> = BTreeMap::new();

    for zone in zones.iter().filter(|z| z.view.is_any()) {
        visible.insert(&zone.name, zone);
    }
    for zone in zones.iter().filter(|z| !z.view.is_any() && z.view.covers(view)) {
        visible.insert(&zone.name, zone);
    }

    visible.into_values().collect()
}
