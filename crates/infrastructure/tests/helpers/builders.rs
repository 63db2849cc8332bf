use dnstree_infrastructure::database::run_migrations;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory model database with the production schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// Inserts model rows the way the model owner would.
pub struct ModelSeed {
    pub pool: SqlitePool,
}

impl ModelSeed {
    pub async fn new() -> Self {
        Self {
            pool: create_test_db().await,
        }
    }

    pub async fn view(&self, name: &str) -> &Self {
        sqlx::query("INSERT INTO views (view_name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .unwrap();
        self
    }

    pub async fn server_set(&self, set: &str, servers: &[&str]) -> &Self {
        sqlx::query("INSERT INTO dns_server_sets (dns_server_set_name) VALUES (?)")
            .bind(set)
            .execute(&self.pool)
            .await
            .unwrap();
        for server in servers {
            sqlx::query("INSERT OR IGNORE INTO dns_servers (dns_server_name) VALUES (?)")
                .bind(*server)
                .execute(&self.pool)
                .await
                .unwrap();
            sqlx::query(
                "INSERT INTO dns_server_set_assignments (dns_server_name, dns_server_set_name)
                 VALUES (?, ?)",
            )
            .bind(*server)
            .bind(set)
            .execute(&self.pool)
            .await
            .unwrap();
        }
        self
    }

    pub async fn assign_view(&self, set: &str, view: &str, order: i64, options: &str) -> &Self {
        sqlx::query(
            "INSERT INTO dns_server_set_view_assignments
             (dns_server_set_name, view_name, view_order, view_options)
             VALUES (?, ?, ?, ?)",
        )
        .bind(set)
        .bind(view)
        .bind(order)
        .bind(options)
        .execute(&self.pool)
        .await
        .unwrap();
        self
    }

    pub async fn acl(&self, name: &str, cidr: &str, allowed: bool) -> &Self {
        sqlx::query("INSERT INTO acls (acl_name, cidr_block, range_allowed) VALUES (?, ?, ?)")
            .bind(name)
            .bind(cidr)
            .bind(allowed)
            .execute(&self.pool)
            .await
            .unwrap();
        self
    }

    pub async fn assign_acl(&self, set: &str, view: &str, acl: &str, order: i64) -> &Self {
        sqlx::query(
            "INSERT INTO view_acl_assignments (view_name, dns_server_set_name, acl_name, acl_order)
             VALUES (?, ?, ?, ?)",
        )
        .bind(view)
        .bind(set)
        .bind(acl)
        .bind(order)
        .execute(&self.pool)
        .await
        .unwrap();
        self
    }

    pub async fn zone(
        &self,
        name: &str,
        view: &str,
        zone_type: &str,
        origin: &str,
        options: &str,
    ) -> &Self {
        sqlx::query(
            "INSERT INTO zones (zone_name, view_name, zone_type, zone_origin, zone_options)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(view)
        .bind(zone_type)
        .bind(origin)
        .bind(options)
        .execute(&self.pool)
        .await
        .unwrap();
        self
    }

    pub async fn record(
        &self,
        zone: &str,
        view: &str,
        record_type: &str,
        target: &str,
        ttl: i64,
        args: &[(&str, &str)],
    ) -> i64 {
        let id = sqlx::query(
            "INSERT INTO records
             (record_type, record_target, record_ttl, record_zone_name, record_view_name)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record_type)
        .bind(target)
        .bind(ttl)
        .bind(zone)
        .bind(view)
        .execute(&self.pool)
        .await
        .unwrap()
        .last_insert_rowid();

        for (name, value) in args {
            sqlx::query(
                "INSERT INTO record_arguments (record_id, argument_name, argument_value)
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(*name)
            .bind(*value)
            .execute(&self.pool)
            .await
            .unwrap();
        }
        id
    }

    pub async fn global_options(&self, set: &str, label: &str, options: &str) -> &Self {
        sqlx::query(
            "INSERT INTO named_conf_global_options
             (dns_server_set_name, options_label, global_options)
             VALUES (?, ?, ?)",
        )
        .bind(set)
        .bind(label)
        .bind(options)
        .execute(&self.pool)
        .await
        .unwrap();
        self
    }

    pub async fn soa(&self, zone: &str, view: &str, serial: &str) -> i64 {
        self.record(
            zone,
            view,
            "soa",
            "@",
            3600,
            &[
                ("name_server", "ns.university.edu."),
                ("admin_email", "hostmaster.ns.university.edu."),
                ("serial_number", serial),
                ("refresh_seconds", "10800"),
                ("retry_seconds", "3600"),
                ("expiry_seconds", "3600000"),
                ("minimum_seconds", "86400"),
            ],
        )
        .await
    }

    /// `set1` serving `sub.university.edu` from `test_view`.
    pub async fn university() -> Self {
        let seed = Self::new().await;
        seed.view("test_view").await;
        seed.server_set("set1", &["dns1"]).await;
        seed.assign_view("set1", "test_view", 1, "").await;
        seed.global_options(
            "set1",
            "options",
            "options {\n\tdirectory \"/var/domain\";\n\trecursion no;\n};",
        )
        .await;
        seed.zone(
            "sub.university.edu",
            "test_view",
            "master",
            "sub.university.edu.",
            "",
        )
        .await;
        seed.soa("sub.university.edu", "test_view", "811").await;
        seed.record(
            "sub.university.edu",
            "any",
            "ns",
            "@",
            3600,
            &[("name_server", "ns.sub.university.edu.")],
        )
        .await;
        seed.record(
            "sub.university.edu",
            "test_view",
            "a",
            "ns",
            3600,
            &[("assignment_ip", "192.168.1.103")],
        )
        .await;
        seed.record(
            "sub.university.edu",
            "test_view",
            "a",
            "ns2",
            3600,
            &[("assignment_ip", "192.168.1.104")],
        )
        .await;
        seed.record(
            "sub.university.edu",
            "test_view",
            "mx",
            "@",
            3600,
            &[("priority", "10"), ("mail_server", "mail1.sub.university.edu.")],
        )
        .await;
        seed
    }
}
