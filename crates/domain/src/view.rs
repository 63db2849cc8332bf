use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of the pseudo-view that matches every view.
pub const ANY_VIEW: &str = "any";

/// A name-server view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct View {
    pub name: Arc<str>,
}

impl View {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
        }
    }
}

/// Which views a zone or record is visible from.
///
/// Zones and records stored under the `any` pseudo-view are merged into every
/// concrete view at render time; a concrete entry of the same name wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewScope {
    Concrete(Arc<str>),
    AnyView,
}

impl ViewScope {
    pub fn concrete(name: &str) -> Self {
        ViewScope::Concrete(Arc::from(name))
    }

    /// Parses a stored view column, mapping `any` to the wildcard.
    pub fn parse(name: &str) -> Self {
        if name == ANY_VIEW {
            ViewScope::AnyView
        } else {
            ViewScope::concrete(name)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViewScope::Concrete(name) => name,
            ViewScope::AnyView => ANY_VIEW,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, ViewScope::AnyView)
    }

    /// True when an entry in this scope is visible from `view`.
    pub fn covers(&self, view: &str) -> bool {
        match self {
            ViewScope::Concrete(name) => name.as_ref() == view,
            ViewScope::AnyView => true,
        }
    }
}

impl fmt::Display for ViewScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
