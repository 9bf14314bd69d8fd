use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};

use crate::config::DbConfig;
use crate::error::StoreError;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Creates the listings database and the `foods` table when they are missing. Safe to run any
/// number of times.
#[tracing::instrument(skip_all, fields(database = %config.name))]
pub async fn initialize(config: &DbConfig) -> Result<(), StoreError> {
    if ensure_database(config).await? {
        tracing::info!("created database {}", config.name);
    } else {
        tracing::info!("database {} already exists", config.name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.connect_options())
        .await?;

    let result = ensure_schema(&pool).await;
    pool.close().await;
    result
}

/// Returns whether the database had to be created.
pub async fn ensure_database(config: &DbConfig) -> Result<bool, StoreError> {
    let mut conn = PgConnection::connect_with(&config.maintenance_options()).await?;

    let created = create_database_if_missing(&mut conn, &config.name).await;
    let closed = conn.close().await;

    let created = created?;
    closed?;
    Ok(created)
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("foods table is ready");
    Ok(())
}

async fn create_database_if_missing(conn: &mut PgConnection, name: &str) -> sqlx::Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1);",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    if exists {
        return Ok(false);
    }

    // CREATE DATABASE takes no bind parameters and cannot run in a prepared statement.
    let statement = format!("CREATE DATABASE {}", quote_identifier(name));
    conn.execute(statement.as_str()).await?;

    Ok(true)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
