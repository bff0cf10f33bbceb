//! 健康检查与 metrics

use atrium_errors::{AppError, AppResult};
use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// 不经过任何授权检查
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn metrics(State(state): State<AppState>) -> AppResult<String> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::not_found("Metrics are disabled"))
}
