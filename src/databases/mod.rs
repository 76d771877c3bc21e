use anyhow::{Context, Result};
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::Config;

pub mod auth;
pub mod todo;

/// Executed in this order: `todo` references `users`.
const SCHEMAS: [(&str, &str); 2] = [
    ("auth", include_str!("auth/schema.sql")),
    ("todo", include_str!("todo/schema.sql")),
];

const REQUIRED_TABLES: [&str; 2] = ["users", "todo"];

async fn missing_tables(pool: &PgPool) -> Result<Vec<&'static str>> {
    let present: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_name::text = ANY($1)",
    )
    .bind(&REQUIRED_TABLES[..])
    .fetch_all(pool)
    .await
    .context("Failed to inspect existing tables")?;

    Ok(REQUIRED_TABLES
        .into_iter()
        .filter(|table| !present.iter().any(|p| p == table))
        .collect())
}

/// Creates the tables if any are missing. Schema statements are idempotent so
/// a partially-created database is completed rather than rejected.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let missing = missing_tables(pool).await?;
    if missing.is_empty() {
        info!("All required tables exist");
        return Ok(());
    }

    info!("Missing tables {:?}, running schema SQL", missing);
    for (name, sql) in SCHEMAS {
        pool.execute(sql)
            .await
            .with_context(|| format!("Failed to execute {} schema", name))?;
    }
    info!("Schema SQL executed successfully");
    Ok(())
}

pub async fn setup_backend(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    ensure_schema(&pool).await?;
    Ok(pool)
}
