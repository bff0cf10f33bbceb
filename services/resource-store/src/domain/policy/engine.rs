//! 授权决策
//!
//! 按 `OperationKind::gates()` 的顺序求值。请求级检查在任何存储访问之前执行；
//! 对象级检查在对象经作用域加载之后执行。

use std::fmt;

use super::context::AuthContext;
use super::gate::{Owned, OwnershipGate, RoleGate};
use super::table::{ELEVATED_ROLES, Gate, OperationKind};
use crate::domain::identity::RoleSet;

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// 操作者未认证
    Unauthenticated,
    /// 缺少该类操作要求的角色
    MissingRole,
    /// 既不是对象所有者也不持有提升角色
    NotOwner,
}

impl Denial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::MissingRole => "missing_role",
            Self::NotOwner => "not_owner",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct PolicyEngine;

impl PolicyEngine {
    /// 请求级检查，跳过对象级检查项
    pub fn authorize_request(op: OperationKind, ctx: &AuthContext) -> Result<(), Denial> {
        for gate in op.gates() {
            match gate {
                Gate::Authenticated => {
                    if !ctx.is_authenticated() {
                        return Err(Denial::Unauthenticated);
                    }
                }
                Gate::AnyRole(roles) => {
                    if !RoleGate::check(ctx, &RoleSet::of(roles)) {
                        return Err(Denial::MissingRole);
                    }
                }
                Gate::Ownership(_) => {}
            }
        }
        Ok(())
    }

    /// 对象级检查，每次对象访问调用一次
    pub fn authorize_object<O: Owned + ?Sized>(
        op: OperationKind,
        ctx: &AuthContext,
        object: &O,
    ) -> Result<(), Denial> {
        if !ctx.is_authenticated() {
            return Err(Denial::Unauthenticated);
        }

        let elevated = RoleSet::of(ELEVATED_ROLES);
        for gate in op.gates() {
            if let Gate::Ownership(access) = gate
                && !OwnershipGate::check(ctx, object, &elevated, *access)
            {
                return Err(Denial::NotOwner);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Principal;
    use atrium_common::UserId;

    struct Doc(UserId);

    impl Owned for Doc {
        fn owner_id(&self) -> &UserId {
            &self.0
        }
    }

    fn ctx(roles: &[&str]) -> AuthContext {
        AuthContext::authenticated(
            Principal {
                user_id: UserId::new(),
                username: "bob".to_string(),
            },
            RoleSet::of(roles),
        )
    }

    #[test]
    fn test_anonymous_is_unauthenticated_for_every_operation() {
        let anonymous = AuthContext::anonymous();
        for op in [
            OperationKind::Create,
            OperationKind::List,
            OperationKind::Retrieve,
            OperationKind::Update,
            OperationKind::Delete,
            OperationKind::ManageIdentity,
            OperationKind::ViewSelf,
        ] {
            assert_eq!(
                PolicyEngine::authorize_request(op, &anonymous),
                Err(Denial::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_create_requires_creator_or_admin() {
        assert_eq!(
            PolicyEngine::authorize_request(OperationKind::Create, &ctx(&[])),
            Err(Denial::MissingRole)
        );
        assert!(PolicyEngine::authorize_request(OperationKind::Create, &ctx(&["creator"])).is_ok());
        assert!(PolicyEngine::authorize_request(OperationKind::List, &ctx(&["admin"])).is_ok());
    }

    #[test]
    fn test_retrieve_needs_no_role() {
        assert!(PolicyEngine::authorize_request(OperationKind::Retrieve, &ctx(&[])).is_ok());
        assert!(PolicyEngine::authorize_request(OperationKind::Update, &ctx(&[])).is_ok());
    }

    #[test]
    fn test_manage_identity_is_admin_only() {
        assert_eq!(
            PolicyEngine::authorize_request(OperationKind::ManageIdentity, &ctx(&["creator"])),
            Err(Denial::MissingRole)
        );
        assert!(
            PolicyEngine::authorize_request(OperationKind::ManageIdentity, &ctx(&["admin"])).is_ok()
        );
    }

    #[test]
    fn test_object_write_checks_owner() {
        let owner = ctx(&["creator"]);
        let doc = Doc(*owner.user_id().unwrap());

        assert!(PolicyEngine::authorize_object(OperationKind::Update, &owner, &doc).is_ok());
        assert_eq!(
            PolicyEngine::authorize_object(OperationKind::Delete, &ctx(&["creator"]), &doc),
            Err(Denial::NotOwner)
        );
        assert!(PolicyEngine::authorize_object(OperationKind::Delete, &ctx(&["admin"]), &doc).is_ok());
        assert!(PolicyEngine::authorize_object(OperationKind::Retrieve, &ctx(&[]), &doc).is_ok());
    }

    #[test]
    fn test_object_check_fails_closed_for_anonymous() {
        let doc = Doc(UserId::new());
        assert_eq!(
            PolicyEngine::authorize_object(OperationKind::Retrieve, &AuthContext::anonymous(), &doc),
            Err(Denial::Unauthenticated)
        );
    }
}
