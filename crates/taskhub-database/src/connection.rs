//! PostgreSQL pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use taskhub_core::config::DatabaseConfig;
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;

/// Shared handle to the sqlx PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Opening PostgreSQL pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Could not reach the database: {e}"),
                    e,
                )
            })?;

        info!("PostgreSQL pool ready");
        Ok(Self { pool })
    }

    /// Borrow the sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `SELECT 1` round trip, used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))
    }

    /// Drain and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

/// Replace the password in a connection URL with `****`.
fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    let Some(at) = url.rfind('@') else {
        return url.to_string();
    };
    match url[scheme_end..at].find(':') {
        Some(rel) => {
            let colon = scheme_end + rel;
            format!("{}:****{}", &url[..colon], &url[at..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_password() {
        assert_eq!(
            mask_password("postgres://taskhub:hunter2@db:5432/taskhub"),
            "postgres://taskhub:****@db:5432/taskhub"
        );
        assert_eq!(
            mask_password("postgres://taskhub@db:5432/taskhub"),
            "postgres://taskhub@db:5432/taskhub"
        );
        assert_eq!(
            mask_password("postgres://db:5432/taskhub"),
            "postgres://db:5432/taskhub"
        );
    }
}
