use async_trait::async_trait;
use dnstree_application::ports::ModelProvider;
use dnstree_domain::{
    Acl, DnsServer, DnsServerSet, DomainError, GlobalOption, RecordData, RecordType,
    ResourceRecord, ServerSetAssignment, ServerSetViewAssignment, View, ViewAclAssignment,
    ViewScope, Zone, ANY_ACL,
};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, instrument};

type ZoneRow = (String, String, String, String, String);
type RecordRow = (i64, String, String, i64);
type ArgumentRow = (i64, String, String);
type AclRow = (String, String, bool);

/// Reads the DNS model from the SQLite schema in `migrations/`.
///
/// Every list is ordered so that an unchanged database yields identical
/// snapshots.
pub struct SqliteModelRepository {
    pool: SqlitePool,
}

impl SqliteModelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
        move |e| {
            error!(error = %e, "{}", context);
            DomainError::DatabaseError(e.to_string())
        }
    }

    fn order(value: i64, what: &str) -> Result<u32, DomainError> {
        u32::try_from(value)
            .map_err(|_| DomainError::DatabaseError(format!("Invalid {} {}", what, value)))
    }

    fn row_to_zone(row: ZoneRow) -> Zone {
        let (name, view, zone_type, origin, options) = row;
        Zone::from_stored(&name, ViewScope::parse(&view), &origin, &zone_type, &options)
    }

    fn row_to_record(
        zone: &str,
        view: &ViewScope,
        row: RecordRow,
        arguments: &BTreeMap<String, String>,
    ) -> Result<ResourceRecord, DomainError> {
        let (id, record_type, target, ttl) = row;
        let invalid = |reason: String| DomainError::InvalidRecord {
            zone: zone.to_string(),
            record: format!("#{} {} {}", id, target, record_type),
            reason,
        };

        let record_type = record_type.parse::<RecordType>().map_err(&invalid)?;
        let ttl = u32::try_from(ttl).map_err(|_| invalid(format!("invalid ttl {}", ttl)))?;
        let data = RecordData::from_arguments(record_type, arguments).map_err(&invalid)?;

        Ok(ResourceRecord::new(zone, view.clone(), &target, ttl, data))
    }
}

#[async_trait]
impl ModelProvider for SqliteModelRepository {
    #[instrument(skip(self))]
    async fn list_views(&self) -> Result<Vec<View>, DomainError> {
        let rows = sqlx::query_as::<_, (String,)>("SELECT view_name FROM views ORDER BY view_name")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error("Failed to query views"))?;

        Ok(rows.into_iter().map(|(name,)| View::new(&name)).collect())
    }

    #[instrument(skip(self))]
    async fn list_zones(&self, view: Option<&ViewScope>) -> Result<Vec<Zone>, DomainError> {
        let rows = match view {
            Some(view) => {
                sqlx::query_as::<_, ZoneRow>(
                    "SELECT zone_name, view_name, zone_type, zone_origin, zone_options
                     FROM zones WHERE view_name = ?
                     ORDER BY zone_name",
                )
                .bind(view.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ZoneRow>(
                    "SELECT zone_name, view_name, zone_type, zone_origin, zone_options
                     FROM zones
                     ORDER BY zone_name, view_name",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Self::db_error("Failed to query zones"))?;

        Ok(rows.into_iter().map(Self::row_to_zone).collect())
    }

    #[instrument(skip(self))]
    async fn list_records(
        &self,
        zone: &str,
        view: &ViewScope,
    ) -> Result<Vec<ResourceRecord>, DomainError> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT id, record_type, record_target, record_ttl
             FROM records
             WHERE record_zone_name = ? AND record_view_name = ?
             ORDER BY id",
        )
        .bind(zone)
        .bind(view.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query records"))?;

        let argument_rows = sqlx::query_as::<_, ArgumentRow>(
            "SELECT a.record_id, a.argument_name, a.argument_value
             FROM record_arguments a
             JOIN records r ON r.id = a.record_id
             WHERE r.record_zone_name = ? AND r.record_view_name = ?",
        )
        .bind(zone)
        .bind(view.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query record arguments"))?;

        let mut arguments: BTreeMap<i64, BTreeMap<String, String>> = BTreeMap::new();
        for (record_id, name, value) in argument_rows {
            arguments.entry(record_id).or_default().insert(name, value);
        }

        let empty = BTreeMap::new();
        rows.into_iter()
            .map(|row| {
                let args = arguments.get(&row.0).unwrap_or(&empty);
                Self::row_to_record(zone, view, row, args)
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn list_acls(&self) -> Result<Vec<Acl>, DomainError> {
        let rows = sqlx::query_as::<_, AclRow>(
            "SELECT acl_name, cidr_block, range_allowed FROM acls ORDER BY acl_name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query ACLs"))?;

        let mut acls: Vec<Acl> = Vec::new();
        for (name, cidr, allowed) in rows {
            if name == ANY_ACL {
                continue;
            }
            if acls.last().map_or(true, |acl| acl.name.as_ref() != name) {
                acls.push(Acl::new(&name, Vec::new()));
            }
            if let Some(acl) = acls.last_mut() {
                acl.push_stored(&cidr, allowed);
            }
        }

        Ok(acls)
    }

    #[instrument(skip(self))]
    async fn list_view_acl_assignments(&self) -> Result<Vec<ViewAclAssignment>, DomainError> {
        let rows = sqlx::query_as::<_, (String, String, String, i64)>(
            "SELECT view_name, dns_server_set_name, acl_name, acl_order
             FROM view_acl_assignments
             ORDER BY dns_server_set_name, view_name, acl_order",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query view ACL assignments"))?;

        rows.into_iter()
            .map(|(view, server_set, acl, order)| {
                Ok(ViewAclAssignment {
                    view: Arc::from(view.as_str()),
                    server_set: Arc::from(server_set.as_str()),
                    acl: Arc::from(acl.as_str()),
                    order: Self::order(order, "ACL order")?,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn list_dns_servers(&self) -> Result<Vec<DnsServer>, DomainError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT dns_server_name FROM dns_servers ORDER BY dns_server_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query DNS servers"))?;

        Ok(rows
            .into_iter()
            .map(|(name,)| DnsServer {
                name: Arc::from(name.as_str()),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_server_sets(&self) -> Result<Vec<DnsServerSet>, DomainError> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT dns_server_set_name FROM dns_server_sets ORDER BY dns_server_set_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query DNS server sets"))?;

        Ok(rows
            .into_iter()
            .map(|(name,)| DnsServerSet::new(&name))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_server_set_assignments(&self) -> Result<Vec<ServerSetAssignment>, DomainError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT dns_server_name, dns_server_set_name
             FROM dns_server_set_assignments
             ORDER BY dns_server_set_name, dns_server_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query server set assignments"))?;

        Ok(rows
            .into_iter()
            .map(|(server, server_set)| ServerSetAssignment {
                server: Arc::from(server.as_str()),
                server_set: Arc::from(server_set.as_str()),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_server_set_view_assignments(
        &self,
    ) -> Result<Vec<ServerSetViewAssignment>, DomainError> {
        let rows = sqlx::query_as::<_, (String, String, i64, String)>(
            "SELECT dns_server_set_name, view_name, view_order, view_options
             FROM dns_server_set_view_assignments
             ORDER BY dns_server_set_name, view_order, view_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query server set view assignments"))?;

        rows.into_iter()
            .map(|(server_set, view, order, options)| {
                Ok(ServerSetViewAssignment {
                    server_set: Arc::from(server_set.as_str()),
                    view: Arc::from(view.as_str()),
                    order: Self::order(order, "view order")?,
                    options: Arc::from(options.as_str()),
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn list_global_options(
        &self,
        server_set: &str,
    ) -> Result<Vec<GlobalOption>, DomainError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT options_label, global_options
             FROM named_conf_global_options
             WHERE dns_server_set_name = ?
             ORDER BY id",
        )
        .bind(server_set)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_error("Failed to query global options"))?;

        Ok(rows
            .into_iter()
            .map(|(label, options)| GlobalOption {
                server_set: Arc::from(server_set),
                label: Arc::from(label.as_str()),
                options: Arc::from(options.as_str()),
            })
            .collect())
    }
}
