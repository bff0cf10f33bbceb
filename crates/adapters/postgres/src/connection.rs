//! PostgreSQL 连接池

use std::time::Duration;

use atrium_errors::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

/// 连接池参数
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    /// 最小连接数不超过上限，上限至少为 1
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}

/// 建立连接池，并在返回前确认数据库可以执行查询
pub async fn connect(config: &PostgresConfig) -> AppResult<PgPool> {
    let pool = config
        .pool_options()
        .connect(&config.url)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))?;

    ping(&pool).await?;
    debug!(max_connections = config.max_connections, "PostgreSQL reachable");
    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Database ping failed: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_connections_bounds_min() {
        let config = PostgresConfig::new("postgres://localhost/atrium").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 1);

        let config = PostgresConfig::new("postgres://localhost/atrium").with_max_connections(25);
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 1);
    }
}
