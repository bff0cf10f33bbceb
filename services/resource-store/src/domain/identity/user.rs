//! 用户与请求主体

use atrium_auth_core::HashedPassword;
use atrium_common::UserId;
use atrium_errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

const MAX_USERNAME_LEN: usize = 150;

/// 用户实体
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: HashedPassword,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, password_hash: HashedPassword) -> AppResult<Self> {
        Ok(Self {
            id: UserId::new(),
            username: validate_username(username)?,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            username: self.username.clone(),
        }
    }
}

/// 用户名：1-150 个字符，仅允许字母、数字和 @ . + - _
pub fn validate_username(username: &str) -> AppResult<String> {
    let username = username.trim();

    if username.is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AppError::validation(
            "Username may only contain letters, digits and @/./+/-/_",
        ));
    }

    Ok(username.to_string())
}

/// 已认证的请求主体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
}

/// 发起请求的一方，由传输层解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated(Principal),
}

impl Actor {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(principal) => Some(principal),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
