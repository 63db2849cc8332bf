use dnstree_domain::validators::validate_path_component;
use dnstree_domain::{
    zones_visible_from, Acl, DnsServer, DnsServerSet, DomainError, RankedList, ServerSetAssignment,
    ServerSetViewAssignment, View, ViewAclAssignment, Zone, ANY_ACL,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::ModelProvider;

/// Immutable copy of the model taken at the start of one export.
///
/// Rows that load but do not parse (zone types, ACL entries) stay in the
/// snapshot; [`ModelSnapshot::plan`] rejects them for the sets that use them.
#[derive(Debug, Clone, Default)]
pub struct ModelSnapshot {
    pub views: Vec<View>,
    pub zones: Vec<Zone>,
    pub acls: BTreeMap<Arc<str>, Acl>,
    pub view_acl_assignments: Vec<ViewAclAssignment>,
    pub servers: Vec<DnsServer>,
    pub server_sets: Vec<DnsServerSet>,
    pub server_set_assignments: Vec<ServerSetAssignment>,
    pub server_set_view_assignments: Vec<ServerSetViewAssignment>,
}

/// One view clause of a server set, with everything needed to render it.
#[derive(Debug, Clone)]
pub struct PlannedView {
    pub name: Arc<str>,
    pub options: Arc<str>,
    /// `match-clients` ACL names in precedence order.
    pub acls: RankedList<Arc<str>>,
    /// Zones visible from this view, specific entries overriding `any`.
    pub zones: Vec<Zone>,
}

/// Everything one server set's tree is rendered from.
#[derive(Debug, Clone)]
pub struct ServerSetPlan {
    pub server_set: Arc<str>,
    pub servers: Vec<Arc<str>>,
    /// View clauses in precedence order.
    pub views: RankedList<PlannedView>,
    /// Distinct ACLs referenced by the views, sorted by name, without `any`.
    pub acls: Vec<Acl>,
}

impl ModelSnapshot {
    /// Reads every list the export needs from `provider` in one pass.
    #[instrument(skip(provider))]
    pub async fn load(provider: &dyn ModelProvider) -> Result<Self, DomainError> {
        let (
            views,
            zones,
            acls,
            view_acl_assignments,
            servers,
            server_sets,
            server_set_assignments,
            server_set_view_assignments,
        ) = futures::try_join!(
            provider.list_views(),
            provider.list_zones(None),
            provider.list_acls(),
            provider.list_view_acl_assignments(),
            provider.list_dns_servers(),
            provider.list_server_sets(),
            provider.list_server_set_assignments(),
            provider.list_server_set_view_assignments(),
        )?;

        let acls = acls
            .into_iter()
            .map(|acl| (Arc::clone(&acl.name), acl))
            .collect();

        debug!(
            views = views.len(),
            zones = zones.len(),
            server_sets = server_sets.len(),
            "Model snapshot loaded"
        );

        Ok(Self {
            views,
            zones,
            acls,
            view_acl_assignments,
            servers,
            server_sets,
            server_set_assignments,
            server_set_view_assignments,
        })
    }

    pub fn server_set(&self, name: &str) -> Option<&DnsServerSet> {
        self.server_sets.iter().find(|set| set.name.as_ref() == name)
    }

    /// Resolves and checks everything a server set's tree depends on.
    ///
    /// # Errors
    ///
    /// * `DomainError::DuplicateOrder` - Two views, or two ACLs of one view,
    ///   share an order within the set
    /// * `DomainError::DanglingReference` - A view, ACL or server assignment
    ///   names an entity that does not exist
    /// * `DomainError::InvalidName` - A name cannot be used as a path component
    /// * `DomainError::InvalidZoneType` - A zone visible from one of the set's
    ///   views has a type that does not parse
    /// * `DomainError::InvalidCidr` - An ACL used by the set has a bad entry
    pub fn plan(&self, set: &DnsServerSet) -> Result<ServerSetPlan, DomainError> {
        let set_name = Arc::clone(&set.name);
        validate_path_component(&set_name, "Server set").map_err(DomainError::InvalidName)?;

        let known_views: BTreeSet<&str> = self.views.iter().map(|v| v.name.as_ref()).collect();

        let mut planned = Vec::new();
        for assignment in self
            .server_set_view_assignments
            .iter()
            .filter(|a| a.server_set == set_name)
        {
            if !known_views.contains(assignment.view.as_ref()) {
                return Err(DomainError::DanglingReference {
                    server_set: set_name.to_string(),
                    kind: "view",
                    name: assignment.view.to_string(),
                });
            }
            validate_path_component(&assignment.view, "View").map_err(DomainError::InvalidName)?;

            let acls = self.view_acls(&set_name, &assignment.view)?;
            let zones = zones_visible_from(&self.zones, &assignment.view)
                .into_iter()
                .map(|zone| {
                    validate_path_component(&zone.name, "Zone")
                        .map_err(DomainError::InvalidName)?;
                    let zone_type = zone.zone_type()?;
                    Ok::<Zone, DomainError>(zone.clone().with_zone_type(zone_type))
                })
                .collect::<Result<Vec<_>, DomainError>>()?;

            planned.push((
                assignment.order,
                PlannedView {
                    name: Arc::clone(&assignment.view),
                    options: Arc::clone(&assignment.options),
                    acls,
                    zones,
                },
            ));
        }

        let views = RankedList::from_unordered(planned).map_err(|dup| {
            DomainError::DuplicateOrder {
                server_set: set_name.to_string(),
                scope: "view".to_string(),
                order: dup.0,
            }
        })?;

        let mut acl_names: BTreeSet<Arc<str>> = BTreeSet::new();
        for view in views.iter() {
            acl_names.extend(view.acls.iter().filter(|n| n.as_ref() != ANY_ACL).cloned());
        }
        let mut acls = Vec::with_capacity(acl_names.len());
        for acl in acl_names.iter().filter_map(|name| self.acls.get(name)) {
            acl.validate()?;
            acls.push(acl.clone());
        }

        let mut servers = Vec::new();
        for assignment in self
            .server_set_assignments
            .iter()
            .filter(|a| a.server_set == set_name)
        {
            if !self.servers.iter().any(|s| s.name == assignment.server) {
                return Err(DomainError::DanglingReference {
                    server_set: set_name.to_string(),
                    kind: "server",
                    name: assignment.server.to_string(),
                });
            }
            servers.push(Arc::clone(&assignment.server));
        }

        Ok(ServerSetPlan {
            server_set: set_name,
            servers,
            views,
            acls,
        })
    }

    fn view_acls(&self, set: &Arc<str>, view: &Arc<str>) -> Result<RankedList<Arc<str>>, DomainError> {
        let mut assigned = Vec::new();
        for assignment in self
            .view_acl_assignments
            .iter()
            .filter(|a| &a.server_set == set && &a.view == view)
        {
            if assignment.acl.as_ref() != ANY_ACL && !self.acls.contains_key(&assignment.acl) {
                return Err(DomainError::DanglingReference {
                    server_set: set.to_string(),
                    kind: "acl",
                    name: assignment.acl.to_string(),
                });
            }
            assigned.push((assignment.order, Arc::clone(&assignment.acl)));
        }

        RankedList::from_unordered(assigned).map_err(|dup| DomainError::DuplicateOrder {
            server_set: set.to_string(),
            scope: format!("acl (view {view})"),
            order: dup.0,
        })
    }
}
