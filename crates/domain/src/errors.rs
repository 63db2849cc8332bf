use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Zone {zone} in view {view} has records but no SOA record")]
    MissingSoa { zone: String, view: String },

    #[error("Zone {zone} in view {view} has more than one SOA record")]
    DuplicateSoa { zone: String, view: String },

    #[error("Duplicate {scope} order {order} in server set {server_set}")]
    DuplicateOrder {
        server_set: String,
        scope: String,
        order: u32,
    },

    #[error("Server set {server_set} references unknown {kind} {name}")]
    DanglingReference {
        server_set: String,
        kind: &'static str,
        name: String,
    },

    #[error("Invalid zone type: {0}")]
    InvalidZoneType(String),

    #[error("Invalid record {record} in zone {zone}: {reason}")]
    InvalidRecord {
        zone: String,
        record: String,
        reason: String,
    },

    #[error("Invalid CIDR block: {0}")]
    InvalidCidr(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Packaging error: {0}")]
    PackagingError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Checker {tool} could not be started: {reason}")]
    CheckerUnavailable { tool: String, reason: String },

    #[error("Checker {tool} timed out after {seconds}s")]
    CheckerTimeout { tool: String, seconds: u64 },

    #[error("Checker {tool} failed: {reason}")]
    CheckerCrashed { tool: String, reason: String },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Errors caused by the model itself; they abort one server set only.
    pub fn is_model_inconsistency(&self) -> bool {
        matches!(
            self,
            DomainError::MissingSoa { .. }
                | DomainError::DuplicateSoa { .. }
                | DomainError::DuplicateOrder { .. }
                | DomainError::DanglingReference { .. }
                | DomainError::InvalidZoneType(_)
                | DomainError::InvalidRecord { .. }
                | DomainError::InvalidCidr(_)
                | DomainError::InvalidName(_)
        )
    }

    /// The external checker itself misbehaved, as opposed to reporting a
    /// problem in the rendered configuration.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            DomainError::CheckerUnavailable { .. }
                | DomainError::CheckerTimeout { .. }
                | DomainError::CheckerCrashed { .. }
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::IoError(err.to_string())
    }
}
