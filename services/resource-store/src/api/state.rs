//! 路由共享状态

use std::sync::Arc;

use atrium_auth_core::TokenService;
use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::{IdentityService, ResourceService};

#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<ResourceService>,
    pub identity: Arc<IdentityService>,
    pub tokens: Arc<TokenService>,
    /// 未启用 metrics 时为 None
    pub metrics: Option<PrometheusHandle>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
