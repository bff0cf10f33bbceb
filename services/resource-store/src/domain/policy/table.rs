//! 操作类别 → 授权检查表

use std::fmt;

use super::gate::Access;
use crate::domain::identity::{ADMIN_ROLE, CREATOR_ROLE};

/// 允许创建和列出资源的角色
pub const CREATOR_ROLES: &[&str] = &[CREATOR_ROLE, ADMIN_ROLE];

/// 绕过所有权限制的角色
pub const ELEVATED_ROLES: &[&str] = &[ADMIN_ROLE];

/// 授权检查项，按表中顺序求值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// 必须已认证
    Authenticated,
    /// 必须持有任一角色
    AnyRole(&'static [&'static str]),
    /// 对象级所有权检查，提升角色为 `ELEVATED_ROLES`
    Ownership(Access),
}

impl Gate {
    /// 是否需要具体对象才能求值
    pub fn is_object_level(&self) -> bool {
        matches!(self, Self::Ownership(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Create,
    List,
    Retrieve,
    Update,
    Delete,
    /// 用户和角色管理
    ManageIdentity,
    /// 查看自己的账号
    ViewSelf,
}

impl OperationKind {
    pub fn gates(self) -> &'static [Gate] {
        match self {
            Self::Create | Self::List => &[Gate::Authenticated, Gate::AnyRole(CREATOR_ROLES)],
            Self::Retrieve => &[Gate::Authenticated, Gate::Ownership(Access::Read)],
            Self::Update | Self::Delete => &[Gate::Authenticated, Gate::Ownership(Access::Write)],
            Self::ManageIdentity => &[Gate::Authenticated, Gate::AnyRole(ELEVATED_ROLES)],
            Self::ViewSelf => &[Gate::Authenticated],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ManageIdentity => "manage_identity",
            Self::ViewSelf => "view_self",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
