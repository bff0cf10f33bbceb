//! 基础设施资源管理

use std::sync::Arc;

use atrium_adapter_postgres::{PostgresConfig, connect};
use atrium_auth_core::TokenService;
use atrium_config::AppConfig;
use atrium_errors::{AppError, AppResult};
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化，交给服务构建路由
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
    metrics_handle: Option<PrometheusHandle>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 建池和探测查询整体重试，数据库可用后才返回。
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { connect(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in as i64,
            config.jwt.issuer.clone(),
            config.jwt.audience.clone(),
        ));

        let metrics_handle = if config.telemetry.metrics_enabled {
            let handle = atrium_telemetry::init_metrics()
                .map_err(|e| AppError::internal(e.to_string()))?;
            info!("Prometheus recorder installed");
            Some(handle)
        } else {
            None
        };

        Ok(Self {
            config,
            postgres_pool,
            token_service,
            metrics_handle,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics_handle.clone()
    }
}
