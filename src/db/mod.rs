//! Database connection management

use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Database every PostgreSQL server has, used to create the ledger database
const MAINTENANCE_DB: &str = "postgres";

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

/// Build connection options for `config.name`
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode: PgSslMode = config.ssl_mode.parse()?;
    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode))
}

/// Double-quote a SQL identifier, doubling embedded quotes
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Create `config.name` on the server unless it already exists
async fn ensure_database(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
    let options = connect_options(config)?.database(MAINTENANCE_DB);
    let mut conn = PgConnection::connect_with(&options).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.name)
            .fetch_one(&mut conn)
            .await?;

    if !exists {
        // CREATE DATABASE takes no bind parameters
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&config.name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %config.name, "Database created");
    }

    conn.close().await
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        if config.create_if_missing {
            ensure_database(config).await?;
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect_with(connect_options(config)?)
            .await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.max_connections,
            "PostgreSQL connection pool established"
        );
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations from `migrations/`
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

/// Connection settings for the `#[ignore]` PostgreSQL tests, honoring `DB_*`
#[cfg(test)]
pub(crate) fn test_config() -> DatabaseConfig {
    let mut config = DatabaseConfig::default();
    config
        .apply_env_overrides(&|key: &str| std::env::var(key).ok())
        .expect("invalid DB_* test environment");
    config
}
