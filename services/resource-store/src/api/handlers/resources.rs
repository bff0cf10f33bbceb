//! 资源 CRUD
//!
//! 处理顺序固定：认证 → 请求级检查 → 解析路径、查询参数和请求体 → 调用服务。

use atrium_errors::{AppError, AppResult};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::dto::{ListParams, PageDto, ResourceDto, ResourceRequest};
use crate::api::extract::{CurrentActor, JsonBody, QueryParams, ResourcePath};
use crate::api::state::AppState;
use crate::domain::policy::OperationKind;

const COLLECTION_PATH: &str = "/resources/";

pub async fn create(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<JsonBody<ResourceRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ResourceDto>)> {
    let admission = state.resources.admit(&actor, OperationKind::Create).await?;
    let JsonBody(body) = body?;

    let resource = state.resources.create(&admission, body.into_create()?).await?;
    Ok((StatusCode::CREATED, Json(resource.into())))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    params: Result<QueryParams<ListParams>, AppError>,
) -> AppResult<Json<PageDto<ResourceDto>>> {
    let admission = state.resources.admit(&actor, OperationKind::List).await?;
    let QueryParams(params) = params?;

    let page = state.resources.list(&admission, params.to_query()?).await?;
    Ok(Json(PageDto::from_paged(page, &params, COLLECTION_PATH)))
}

pub async fn retrieve(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: ResourcePath,
) -> AppResult<Json<ResourceDto>> {
    let admission = state.resources.admit(&actor, OperationKind::Retrieve).await?;

    let resource = state.resources.retrieve(&admission, path.id()?).await?;
    Ok(Json(resource.into()))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: ResourcePath,
    body: Result<JsonBody<ResourceRequest>, AppError>,
) -> AppResult<Json<ResourceDto>> {
    let admission = state.resources.admit(&actor, OperationKind::Update).await?;
    let id = path.id()?;
    let JsonBody(body) = body?;

    let resource = state.resources.update(&admission, body.into_update(id)?).await?;
    Ok(Json(resource.into()))
}

pub async fn replace(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: ResourcePath,
    body: Result<JsonBody<ResourceRequest>, AppError>,
) -> AppResult<Json<ResourceDto>> {
    let admission = state.resources.admit(&actor, OperationKind::Update).await?;
    let id = path.id()?;
    let JsonBody(body) = body?;

    let resource = state
        .resources
        .replace(&admission, body.into_replace(id)?)
        .await?;
    Ok(Json(resource.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: ResourcePath,
) -> AppResult<StatusCode> {
    let admission = state.resources.admit(&actor, OperationKind::Delete).await?;

    state.resources.delete(&admission, path.id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
