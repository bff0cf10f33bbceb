//! 用户与角色管理

use atrium_errors::{AppError, AppResult};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::dto::{CreateUserRequest, UserDto};
use crate::api::extract::{CurrentActor, JsonBody, UserRolePath};
use crate::api::state::AppState;
use crate::application::CreateUserCommand;
use crate::domain::policy::OperationKind;

pub async fn me(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Json<UserDto>> {
    let admission = state.identity.admit(&actor, OperationKind::ViewSelf).await?;
    let view = state.identity.me(&admission).await?;
    Ok(Json(view.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<JsonBody<CreateUserRequest>, AppError>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    let admission = state
        .identity
        .admit(&actor, OperationKind::ManageIdentity)
        .await?;
    let JsonBody(body) = body?;

    let cmd = CreateUserCommand {
        username: body.username,
        password: body.password,
        roles: body.roles,
    };
    let view = state.identity.create_user(&admission, cmd).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

pub async fn grant_role(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: UserRolePath,
) -> AppResult<StatusCode> {
    let admission = state
        .identity
        .admit(&actor, OperationKind::ManageIdentity)
        .await?;

    state
        .identity
        .grant_role(&admission, path.user_id()?, &path.role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_role(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: UserRolePath,
) -> AppResult<StatusCode> {
    let admission = state
        .identity
        .admit(&actor, OperationKind::ManageIdentity)
        .await?;

    state
        .identity
        .revoke_role(&admission, path.user_id()?, &path.role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
