//! 资源可见范围
//!
//! 作用域由授权决定，必须最先应用；后续的搜索、排序、分页只能在其内部收窄。

use atrium_common::UserId;

use crate::domain::policy::{AuthContext, ELEVATED_ROLES};
use crate::domain::identity::RoleSet;

use super::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// 空集
    Nothing,
    /// 仅限该用户拥有的资源
    OwnedBy(UserId),
    /// 全部资源
    All,
}

impl ResourceScope {
    pub fn for_actor(ctx: &AuthContext) -> Self {
        let Some(user_id) = ctx.user_id() else {
            return Self::Nothing;
        };

        if ctx.roles().intersects(&RoleSet::of(ELEVATED_ROLES)) {
            Self::All
        } else {
            Self::OwnedBy(*user_id)
        }
    }

    pub fn admits(&self, resource: &Resource) -> bool {
        match self {
            Self::Nothing => false,
            Self::OwnedBy(user_id) => resource.owner.id == *user_id,
            Self::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Principal;

    fn ctx(roles: &[&str]) -> AuthContext {
        AuthContext::authenticated(
            Principal {
                user_id: UserId::new(),
                username: "carol".to_string(),
            },
            RoleSet::of(roles),
        )
    }

    #[test]
    fn test_anonymous_sees_nothing() {
        assert_eq!(ResourceScope::for_actor(&AuthContext::anonymous()), ResourceScope::Nothing);
    }

    #[test]
    fn test_admin_sees_all() {
        assert_eq!(ResourceScope::for_actor(&ctx(&["admin"])), ResourceScope::All);
        assert_eq!(
            ResourceScope::for_actor(&ctx(&["creator", "admin"])),
            ResourceScope::All
        );
    }

    #[test]
    fn test_others_see_own() {
        let creator = ctx(&["creator"]);
        assert_eq!(
            ResourceScope::for_actor(&creator),
            ResourceScope::OwnedBy(*creator.user_id().unwrap())
        );

        let nobody = ctx(&[]);
        assert_eq!(
            ResourceScope::for_actor(&nobody),
            ResourceScope::OwnedBy(*nobody.user_id().unwrap())
        );
    }

    #[test]
    fn test_admits() {
        let owner = ctx(&[]);
        let resource = Resource::new(owner.principal().unwrap(), "Mine", None).unwrap();

        assert!(ResourceScope::for_actor(&owner).admits(&resource));
        assert!(!ResourceScope::for_actor(&ctx(&["creator"])).admits(&resource));
        assert!(ResourceScope::All.admits(&resource));
        assert!(!ResourceScope::Nothing.admits(&resource));
    }
}
