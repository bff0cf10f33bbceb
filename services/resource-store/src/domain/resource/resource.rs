//! 资源实体

use atrium_common::{AuditInfo, UserId};
use atrium_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::identity::Principal;
use crate::domain::policy::Owned;

const MAX_TITLE_LEN: usize = 200;

/// 资源 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ResourceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 资源所有者，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwner {
    pub id: UserId,
    pub username: String,
}

impl From<&Principal> for ResourceOwner {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id,
            username: principal.username.clone(),
        }
    }
}

/// 资源实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub owner: ResourceOwner,
    pub title: String,
    pub data: Value,
    pub audit_info: AuditInfo,
}

impl Resource {
    /// 所有者取自创建者，不接受外部传入
    pub fn new(creator: &Principal, title: &str, data: Option<Value>) -> AppResult<Self> {
        Ok(Self {
            id: ResourceId::new(),
            owner: ResourceOwner::from(creator),
            title: validate_title(title)?,
            data: data.unwrap_or_else(empty_data),
            audit_info: AuditInfo::new(),
        })
    }

    /// 应用已校验的修改；`owner` 与 `id` 不在可修改范围内
    pub fn apply(&mut self, patch: &ResourcePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(data) = &patch.data {
            self.data = data.clone();
        }
        self.audit_info.touch();
    }
}

impl Owned for Resource {
    fn owner_id(&self) -> &UserId {
        &self.owner.id
    }
}

/// 已校验的字段修改，`None` 表示保留原值
///
/// 存储层据此在一条语句内完成读改写。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    title: Option<String>,
    data: Option<Value>,
}

impl ResourcePatch {
    /// 部分更新：只修改提供的字段
    pub fn partial(title: Option<&str>, data: Option<Value>) -> AppResult<Self> {
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            data,
        })
    }

    /// 整体替换：`title` 必填，缺省的 `data` 重置为 `{}`
    pub fn replacement(title: &str, data: Option<Value>) -> AppResult<Self> {
        Ok(Self {
            title: Some(validate_title(title)?),
            data: Some(data.unwrap_or_else(empty_data)),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

pub fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(AppError::validation("title: This field may not be blank."));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "title: Ensure this field has no more than {} characters.",
            MAX_TITLE_LEN
        )));
    }

    Ok(title.to_string())
}

fn empty_data() -> Value {
    Value::Object(Default::default())
}
