//! 请求与响应 DTO

use atrium_common::PagedResult;
use atrium_errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::application::{
    CreateResourceCommand, IssuedToken, ListResourcesQuery, ReplaceResourceCommand,
    UpdateResourceCommand, UserView,
};
use crate::domain::resource::{Resource, ResourceId};

/// 资源请求体
///
/// 请求中的 `owner`、`id`、时间戳等字段一律忽略。
#[derive(Debug, Default, Deserialize)]
pub struct ResourceRequest {
    /// 外层 `None` 表示未提供，`Some(None)` 表示显式的 `null`
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    pub data: Option<Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ResourceRequest {
    pub fn into_create(self) -> AppResult<CreateResourceCommand> {
        let (title, data) = self.into_fields()?;
        Ok(CreateResourceCommand { title, data })
    }

    pub fn into_update(self, id: ResourceId) -> AppResult<UpdateResourceCommand> {
        let (title, data) = self.into_fields()?;
        Ok(UpdateResourceCommand { id, title, data })
    }

    pub fn into_replace(self, id: ResourceId) -> AppResult<ReplaceResourceCommand> {
        let (title, data) = self.into_fields()?;
        Ok(ReplaceResourceCommand { id, title, data })
    }

    fn into_fields(self) -> AppResult<(Option<String>, Option<Value>)> {
        let title = match self.title {
            Some(None) => return Err(AppError::validation("title: This field may not be null.")),
            title => title.flatten(),
        };
        Ok((title, self.data))
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceDto {
    pub id: Uuid,
    /// 所有者用户名，只读
    pub owner: String,
    pub title: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resource> for ResourceDto {
    fn from(resource: Resource) -> Self {
        Self {
            id: resource.id.0,
            owner: resource.owner.username,
            title: resource.title,
            data: resource.data,
            created_at: resource.audit_info.created_at,
            updated_at: resource.audit_info.updated_at,
        }
    }
}

/// 列表查询参数
///
/// `page` 无法解析时返回 404，`page_size` 无法解析时使用默认值。
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> AppResult<ListResourcesQuery> {
        let page = match self.page.as_deref().map(str::trim) {
            None => None,
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| AppError::not_found("Invalid page."))?,
            ),
        };

        Ok(ListResourcesQuery {
            page,
            page_size: self
                .page_size
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u32>().ok()),
            search: self.search.clone(),
            ordering: self.ordering.clone(),
        })
    }

    /// 翻页链接，保留其余查询参数；第 1 页不带 `page`
    fn link(&self, path: &str, page: u32) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if page > 1 {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = &self.page_size {
            pairs.push(("page_size", size.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }

        if pairs.is_empty() {
            return path.to_string();
        }
        let query = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", path, query)
    }
}

/// 分页响应
#[derive(Debug, Serialize)]
pub struct PageDto<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageDto<T> {
    pub fn from_paged<U: Into<T>>(result: PagedResult<U>, params: &ListParams, path: &str) -> Self {
        let next = result
            .has_next()
            .then(|| params.link(path, result.page + 1));
        let previous = result
            .has_previous()
            .then(|| params.link(path, result.page - 1));

        Self {
            count: result.total,
            next,
            previous,
            results: result.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "Bearer",
            expires_in: token.expires_in,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserView> for UserDto {
    fn from(view: UserView) -> Self {
        Self {
            id: view.user.id.0,
            username: view.user.username,
            is_active: view.user.is_active,
            roles: view.roles.names(),
            created_at: view.user.created_at,
        }
    }
}
