//! 身份与角色存储接口

use async_trait::async_trait;
use atrium_common::UserId;
use atrium_errors::AppResult;

use super::role::{RoleName, RoleSet};
use super::user::User;

/// 用户、角色及其多对多关系的存储
///
/// 角色成员关系必须读取当前已提交的状态，实现方不得跨请求缓存。
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// 根据 ID 查找用户
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据用户名查找用户
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// 创建用户，用户名重复时返回 Conflict
    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// 在同一事务中创建用户并授予角色；任一步失败时不留下任何记录
    async fn create_user_with_roles(&self, user: &User, roles: &RoleSet) -> AppResult<()>;

    /// 获取用户当前的角色集合
    async fn roles_of(&self, user_id: &UserId) -> AppResult<RoleSet>;

    /// 确保角色存在
    async fn ensure_role(&self, role: &RoleName) -> AppResult<()>;

    /// 为用户授予角色（幂等，角色不存在时创建）
    async fn grant_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()>;

    /// 撤销用户的角色（幂等）
    async fn revoke_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()>;
}
