use async_trait::async_trait;
use dnstree_domain::{
    Acl, DnsServer, DnsServerSet, DomainError, GlobalOption, ResourceRecord,
    ServerSetAssignment, ServerSetViewAssignment, View, ViewAclAssignment, ViewScope, Zone,
};

/// Read-only query interface over the relational DNS model.
///
/// Every method returns a snapshot; the export engine never writes through
/// this port. Implementations should return rows in a stable order so that
/// identical models render to identical trees.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Lists every concrete view.
    async fn list_views(&self) -> Result<Vec<View>, DomainError>;

    /// Lists zones, optionally only those stored under `view`.
    ///
    /// Zone types are returned as stored; an unknown type is not an error
    /// here.
    ///
    /// # Arguments
    ///
    /// * `view` - `None` for every zone, `Some(ViewScope::AnyView)` for the
    ///   wildcard zones only, `Some(ViewScope::Concrete(..))` for one view
    async fn list_zones(&self, view: Option<&ViewScope>) -> Result<Vec<Zone>, DomainError>;

    /// Lists the records stored for exactly (`zone`, `view`).
    ///
    /// Records of the wildcard view are not included for a concrete `view`;
    /// callers merge them explicitly.
    async fn list_records(
        &self,
        zone: &str,
        view: &ViewScope,
    ) -> Result<Vec<ResourceRecord>, DomainError>;

    /// Lists ACLs with their CIDR entries. The built-in `any` may be omitted.
    /// Entries that are not CIDR blocks are recorded on the ACL
    /// (see `Acl::validate`) rather than failing the call.
    async fn list_acls(&self) -> Result<Vec<Acl>, DomainError>;

    async fn list_view_acl_assignments(&self) -> Result<Vec<ViewAclAssignment>, DomainError>;

    async fn list_dns_servers(&self) -> Result<Vec<DnsServer>, DomainError>;

    async fn list_server_sets(&self) -> Result<Vec<DnsServerSet>, DomainError>;

    async fn list_server_set_assignments(&self) -> Result<Vec<ServerSetAssignment>, DomainError>;

    async fn list_server_set_view_assignments(
        &self,
    ) -> Result<Vec<ServerSetViewAssignment>, DomainError>;

    /// Lists the global option blocks of `server_set` in the order they are
    /// to be rendered.
    async fn list_global_options(&self, server_set: &str)
        -> Result<Vec<GlobalOption>, DomainError>;
}
