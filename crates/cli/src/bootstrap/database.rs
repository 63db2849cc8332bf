use dnstree_domain::config::DatabaseConfig;
use dnstree_infrastructure::database::create_pool;
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let database_url = cfg.url();
    info!("Opening model database: {}", database_url);

    let pool = create_pool(&database_url, cfg.max_connections)
        .await
        .map_err(|e| {
            error!("Failed to open model database: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!(max_connections = cfg.max_connections, "Model database ready");
    Ok(pool)
}
