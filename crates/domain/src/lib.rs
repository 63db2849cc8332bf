//! dnstree Domain Layer
pub mod acl;
pub mod config;
pub mod errors;
pub mod export;
pub mod ranked;
pub mod record;
pub mod server;
pub mod validation;
pub mod validators;
pub mod view;
pub mod zone;

pub use acl::{Acl, AclEntry, ANY_ACL};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use export::{
    ExportState, ExportSummary, IterationId, PackagedArchive, RenderedFile, RenderedTree,
    ServerSetOutcome,
};
pub use ranked::{DuplicateRank, Ranked, RankedList};
pub use record::{RecordData, RecordType, ResourceRecord, SoaData};
pub use server::{
    server_set_directory, server_set_from_directory, DnsServer, DnsServerSet, GlobalOption,
    ServerSetAssignment, ServerSetViewAssignment, ViewAclAssignment,
};
pub use validation::{
    CheckOutput, CheckTarget, Finding, ServerSetValidation, ValidationReport,
};
pub use view::{View, ViewScope, ANY_VIEW};
pub use zone::{zones_visible_from, Zone, ZoneType};
