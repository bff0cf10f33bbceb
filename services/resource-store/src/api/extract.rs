//! 请求提取器
//!
//! 所有拒绝都转换为 `AppError`，保证错误响应统一为 problem details。
//! 除 `CurrentActor` 外，处理器以 `Result<_, AppError>` 接收这些提取器，
//! 待请求级检查通过后再取出结果；路径参数同样在检查之后才解析。

use std::sync::Arc;

use atrium_auth_core::TokenService;
use atrium_common::UserId;
use atrium_errors::{AppError, AppResult};
use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::identity::{Actor, Principal};
use crate::domain::resource::ResourceId;

/// 当前操作者
///
/// 没有 `Authorization` 头时为匿名；令牌无效时直接返回 401。
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(Actor::Anonymous));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Invalid Authorization header"))?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.validate_access_token(token).map_err(|e| {
            warn!(error = %e, "Token validation failed");
            e
        })?;

        Ok(Self(Actor::Authenticated(Principal {
            user_id: claims.user_id()?,
            username: claims.username,
        })))
    }
}

/// JSON 请求体，解析失败返回 400
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Self(value))
            .map_err(|rejection| AppError::validation(rejection.body_text()))
    }
}

/// 查询参数，解析失败返回 400
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| AppError::validation(rejection.body_text()))
    }
}

/// `/resources/{id}/` 的原始路径参数
pub struct ResourcePath(String);

impl ResourcePath {
    /// 非法 ID 与不存在同样返回 404
    pub fn id(&self) -> AppResult<ResourceId> {
        self.0
            .parse::<ResourceId>()
            .map_err(|_| AppError::not_found("No Resource matches the given query."))
    }
}

impl<S> FromRequestParts<S> for ResourcePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("No Resource matches the given query."))?;
        Ok(Self(raw))
    }
}

/// `/users/{id}/roles/{role}` 的原始路径参数
pub struct UserRolePath {
    id: String,
    pub role: String,
}

impl UserRolePath {
    pub fn user_id(&self) -> AppResult<UserId> {
        UserId::from_string(&self.id).map_err(|_| AppError::not_found("User not found"))
    }
}

impl<S> FromRequestParts<S> for UserRolePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((id, role)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("User not found"))?;
        Ok(Self { id, role })
    }
}
