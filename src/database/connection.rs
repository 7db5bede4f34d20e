use std::time::Duration;

use crate::{config::DatabaseConfig, error::Result};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connects to Postgres and brings the catalog schema up to date.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    if let Err(e) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Catalog migrations failed: {}", e);
        return Err(sqlx::Error::from(e).into());
    }

    tracing::info!(
        "Catalog database ready ({} max connections, {}s acquire timeout)",
        config.max_connections,
        config.acquire_timeout_secs
    );

    Ok(pool)
}

pub async fn check_health(pool: &PgPool) -> Result<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}
