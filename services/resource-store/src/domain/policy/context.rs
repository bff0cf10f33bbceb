//! 授权上下文

use atrium_common::UserId;

use crate::domain::identity::{Actor, Principal, RoleSet};

/// 单次请求的授权上下文：操作者 + 本次请求从存储读取的角色集合
#[derive(Debug, Clone)]
pub struct AuthContext {
    actor: Actor,
    roles: RoleSet,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            actor: Actor::Anonymous,
            roles: RoleSet::new(),
        }
    }

    pub fn authenticated(principal: Principal, roles: RoleSet) -> Self {
        Self {
            actor: Actor::Authenticated(principal),
            roles,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.actor.principal()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.principal().map(|p| &p.user_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_authenticated()
    }

    /// 匿名上下文的角色集合恒为空
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}
