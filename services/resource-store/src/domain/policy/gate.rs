//! RoleGate / OwnershipGate

use atrium_common::UserId;

use super::context::AuthContext;
use crate::domain::identity::RoleSet;

/// 对象访问类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 只读（安全方法）
    Read,
    /// 修改或删除
    Write,
}

/// 有唯一所有者的对象
pub trait Owned {
    fn owner_id(&self) -> &UserId;
}

/// 请求级角色检查
pub struct RoleGate;

impl RoleGate {
    /// 未认证恒为 false；`required` 为空时不限制；否则要求角色集合相交
    pub fn check(ctx: &AuthContext, required: &RoleSet) -> bool {
        if !ctx.is_authenticated() {
            return false;
        }
        if required.is_empty() {
            return true;
        }
        ctx.roles().intersects(required)
    }
}

/// 对象级所有权检查，每次对象访问单独求值
pub struct OwnershipGate;

impl OwnershipGate {
    pub fn check<O: Owned + ?Sized>(
        ctx: &AuthContext,
        object: &O,
        elevated: &RoleSet,
        access: Access,
    ) -> bool {
        let Some(user_id) = ctx.user_id() else {
            return false;
        };

        match access {
            Access::Read => true,
            Access::Write => object.owner_id() == user_id || ctx.roles().intersects(elevated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Principal;

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
                username: "alice".to_string(),
            },
            RoleSet::of(roles),
        )
    }

    #[test]
    fn test_role_gate_fails_closed_for_anonymous() {
        let anonymous = AuthContext::anonymous();
        assert!(!RoleGate::check(&anonymous, &RoleSet::new()));
        assert!(!RoleGate::check(&anonymous, &RoleSet::of(&["creator"])));
    }

    #[test]
    fn test_role_gate_empty_requirement_allows() {
        assert!(RoleGate::check(&ctx(&[]), &RoleSet::new()));
    }

    #[test]
    fn test_role_gate_any_of() {
        let required = RoleSet::of(&["creator", "admin"]);
        assert!(RoleGate::check(&ctx(&["creator"]), &required));
        assert!(RoleGate::check(&ctx(&["admin"]), &required));
        assert!(RoleGate::check(&ctx(&["viewer", "admin"]), &required));
        assert!(!RoleGate::check(&ctx(&["viewer"]), &required));
        assert!(!RoleGate::check(&ctx(&[]), &required));
    }

    #[test]
    fn test_ownership_read_allows_any_authenticated() {
        let doc = Doc(UserId::new());
        let elevated = RoleSet::of(&["admin"]);

        assert!(OwnershipGate::check(&ctx(&[]), &doc, &elevated, Access::Read));
        assert!(!OwnershipGate::check(&AuthContext::anonymous(), &doc, &elevated, Access::Read));
    }

    #[test]
    fn test_ownership_write_requires_owner_or_elevated() {
        let elevated = RoleSet::of(&["admin"]);
        let owner = ctx(&[]);
        let doc = Doc(*owner.user_id().unwrap());

        assert!(OwnershipGate::check(&owner, &doc, &elevated, Access::Write));
        assert!(!OwnershipGate::check(&ctx(&["creator"]), &doc, &elevated, Access::Write));
        assert!(OwnershipGate::check(&ctx(&["admin"]), &doc, &elevated, Access::Write));
        assert!(!OwnershipGate::check(&AuthContext::anonymous(), &doc, &elevated, Access::Write));
    }
}
