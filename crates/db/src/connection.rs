use std::time::Duration;

use paysys_core::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

/// Opens the pool described by the application config.
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(
        database.url.expose_secret(),
        database.max_connections,
        database.timeout_secs,
    )
    .await
}

/// Every pooled connection enforces foreign keys, runs in WAL mode and waits
/// up to five seconds on a locked database before failing a statement.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use paysys_core::config::DatabaseConfig;

    use super::connect;

    #[tokio::test]
    async fn connect_opens_pool_from_config() {
        let database = DatabaseConfig {
            url: "sqlite::memory:".to_string().into(),
            max_connections: 1,
            timeout_secs: 5,
        };

        let pool = connect(&database).await.expect("pool should connect");
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.expect("select");

        assert_eq!(one, 1);
        pool.close().await;
    }
}
