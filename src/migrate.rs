//! Database migration utilities

use sqlx_migrator::{Migrate, Plan};
use std::path::Path;

use crate::config::Config;

/// Run all database migrations
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let mut conn = pool.acquire().await?;

    mise_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    drop(conn);
    pool.close().await;

    tracing::info!(url = %config.database.url, "database migrated");

    Ok(())
}

/// Drop the database file if it exists and run migrations
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    let path = database_path(&config.database.url);

    if Path::new(path).exists() {
        std::fs::remove_file(path)?;
        tracing::info!("Dropped database: {}", path);
    }

    for suffix in ["-wal", "-shm"] {
        let sidecar = format!("{path}{suffix}");
        if Path::new(&sidecar).exists() {
            std::fs::remove_file(&sidecar)?;
        }
    }

    migrate(config).await
}

fn database_path(url: &str) -> &str {
    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    let path = path.strip_prefix("//").unwrap_or(path);

    path.split('?').next().unwrap_or(path)
}
