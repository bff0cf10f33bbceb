//! 登录

use atrium_errors::AppResult;
use axum::Json;
use axum::extract::State;

use crate::api::dto::{TokenRequest, TokenResponse};
use crate::api::extract::JsonBody;
use crate::api::state::AppState;

pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .identity
        .authenticate(&body.username, &body.password)
        .await?;
    Ok(Json(token.into()))
}
