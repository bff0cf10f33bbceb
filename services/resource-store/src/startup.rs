//! 应用装配

use std::sync::Arc;

use atrium_adapter_postgres::MigrationManager;
use atrium_auth_core::TokenService;
use atrium_bootstrap::Infrastructure;
use atrium_config::PaginationConfig;
use atrium_errors::AppResult;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use crate::api::{AppState, build_router};
use crate::application::{Authorizer, IdentityService, ResourceService};
use crate::domain::identity::IdentityStore;
use crate::domain::resource::ResourceRepository;
use crate::infrastructure::persistence::{
    PostgresIdentityStore, PostgresResourceRepository, migrations,
};

/// 执行迁移、初始化内置角色，并构建路由
pub async fn build_app(infra: Infrastructure) -> AppResult<Router> {
    let pool = infra.postgres_pool();

    let result = MigrationManager::new(pool.clone())
        .migrate(&migrations())
        .await?;
    info!(
        applied = result.applied_count(),
        skipped = result.skipped.len(),
        "Database migrations complete"
    );

    let state = build_state(
        Arc::new(PostgresIdentityStore::new(pool.clone())),
        Arc::new(PostgresResourceRepository::new(pool)),
        infra.token_service(),
        infra.config().pagination,
        infra.metrics_handle(),
    );
    state.identity.seed(&infra.config().bootstrap).await?;

    Ok(build_router(state))
}

/// 按给定的存储实现组装服务
pub fn build_state(
    identity_store: Arc<dyn IdentityStore>,
    resource_repository: Arc<dyn ResourceRepository>,
    tokens: Arc<TokenService>,
    pagination: PaginationConfig,
    metrics: Option<PrometheusHandle>,
) -> AppState {
    let authorizer = Arc::new(Authorizer::new(identity_store.clone()));

    AppState {
        resources: Arc::new(ResourceService::new(
            resource_repository,
            authorizer.clone(),
            pagination,
        )),
        identity: Arc::new(IdentityService::new(identity_store, authorizer, tokens.clone())),
        tokens,
        metrics,
    }
}
