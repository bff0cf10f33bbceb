//! 角色
//!
//! 角色是扁平的字符串标签：没有层级、没有继承，成员关系就是集合成员关系。

use std::collections::BTreeSet;
use std::fmt;

use atrium_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";
pub const CREATOR_ROLE: &str = "creator";

const MAX_ROLE_NAME_LEN: usize = 50;

/// 角色名（全局唯一）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        let name = name.trim();

        if name.is_empty() {
            return Err(AppError::validation("Role name must not be empty"));
        }
        if name.chars().count() > MAX_ROLE_NAME_LEN {
            return Err(AppError::validation(format!(
                "Role name must be at most {} characters",
                MAX_ROLE_NAME_LEN
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        {
            return Err(AppError::validation(
                "Role name may only contain letters, digits, '-', '_', '.' and ':'",
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn admin() -> Self {
        Self(ADMIN_ROLE.to_string())
    }

    pub fn creator() -> Self {
        Self(CREATOR_ROLE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 角色集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet(BTreeSet<RoleName>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由内置角色名构造（名称在编译期已知合法）
    pub fn of(names: &[&str]) -> Self {
        Self(names.iter().map(|n| RoleName(n.to_string())).collect())
    }

    pub fn insert(&mut self, role: RoleName) -> bool {
        self.0.insert(role)
    }

    pub fn remove(&mut self, role: &RoleName) -> bool {
        self.0.remove(role)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.as_str() == role)
    }

    /// 任一相交即为真（ANY-of 语义）
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0.iter().any(|r| other.0.contains(r))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleName> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|r| r.0.clone()).collect()
    }
}

impl FromIterator<RoleName> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
