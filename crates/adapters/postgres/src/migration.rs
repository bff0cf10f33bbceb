//! PostgreSQL 迁移管理模块
//!
//! 按版本号顺序执行 SQL 迁移，记录 SHA-256 校验和，拒绝被修改过的已应用迁移

use std::collections::HashMap;

use atrium_errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};

/// 迁移记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    /// 可包含多条语句
    pub up_sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let checksum = hex::encode(Sha256::digest(up_sql.as_bytes()));
        Self {
            version,
            name: name.into(),
            up_sql,
            checksum,
        }
    }
}

/// 迁移结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
}

impl MigrationResult {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// 已应用迁移的记录表
const MIGRATIONS_TABLE: &str = "_migrations";

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 初始化迁移表
    pub async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            MIGRATIONS_TABLE
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

        Ok(())
    }

    /// 获取已应用的迁移
    pub async fn applied_migrations(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {} ORDER BY version ASC",
            MIGRATIONS_TABLE
        );

        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get migrations: {}", e)))
    }

    /// 在单个事务中应用一个迁移
    async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {}: {}",
                    migration.version, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            MIGRATIONS_TABLE
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = %migration.name,
            "Migration applied"
        );

        Ok(())
    }

    /// 应用所有待处理的迁移
    ///
    /// 任一迁移失败或校验和不一致时立即返回错误，后续迁移不再执行
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;

        let applied: HashMap<i64, String> = self
            .applied_migrations()
            .await?
            .into_iter()
            .map(|record| (record.version, record.checksum))
            .collect();

        let mut sorted: Vec<&Migration> = migrations.iter().collect();
        sorted.sort_by_key(|m| m.version);

        let mut result = MigrationResult::default();
        for migration in sorted {
            match applied.get(&migration.version) {
                Some(checksum) if checksum != &migration.checksum => {
                    warn!(version = migration.version, "Migration checksum mismatch");
                    return Err(AppError::internal(format!(
                        "Migration {} ({}) has been modified after it was applied",
                        migration.version, migration.name
                    )));
                }
                Some(_) => result.skipped.push(migration.version),
                None => {
                    self.apply(migration).await?;
                    result.applied.push(migration.version);
                }
            }
        }

        Ok(result)
    }
}
