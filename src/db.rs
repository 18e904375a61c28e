use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const DEFAULT_POOL_SIZE: u32 = 5;

/// Connects the shared Postgres pool from `DATABASE_URL`. The schema is
/// assumed to already exist; startup performs no migration.
pub async fn connect() -> anyhow::Result<PgPool> {
    let url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres connection string")?;
    let max_connections = match std::env::var("PORTAL_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .context("PORTAL_DB_POOL_SIZE must be a positive integer")?,
        Err(_) => DEFAULT_POOL_SIZE,
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await
        .context("could not connect to the portal database")?;
    log::info!("connected to portal database (pool size {})", max_connections);
    Ok(pool)
}
