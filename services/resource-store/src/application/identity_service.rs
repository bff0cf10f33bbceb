//! 身份服务：登录、用户与角色管理、启动初始化

use std::sync::Arc;

use atrium_auth_core::{HashedPassword, TokenService};
use atrium_common::UserId;
use atrium_config::BootstrapConfig;
use atrium_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use super::authorizer::{Admission, Authorizer};
use super::commands::CreateUserCommand;
use crate::domain::identity::{Actor, IdentityStore, RoleName, RoleSet, User};
use crate::domain::policy::OperationKind;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// 签发的访问令牌
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// 用户及其当前角色
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    pub roles: RoleSet,
}

pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
    authorizer: Arc<Authorizer>,
    tokens: Arc<TokenService>,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        authorizer: Arc<Authorizer>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            authorizer,
            tokens,
        }
    }

    pub async fn admit(&self, actor: &Actor, op: OperationKind) -> AppResult<Admission> {
        self.authorizer.admit(actor, op).await
    }

    /// 用户不存在、密码错误、账号停用返回同一个错误
    ///
    /// 用户不存在时仍对固定哈希做一次校验，各分支耗时相当。
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.store.find_user_by_username(username.trim()).await? else {
            HashedPassword::dummy().verify(password)?;
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !user.is_active || !user.password_hash.verify(password)? {
            warn!(username = %user.username, "Rejected login attempt");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let access_token = self.tokens.generate_access_token(&user.id, &user.username)?;
        info!(user_id = %user.id, "Access token issued");

        Ok(IssuedToken {
            access_token,
            expires_in: self.tokens.access_token_expires_in(),
        })
    }

    pub async fn me(&self, admission: &Admission) -> AppResult<UserView> {
        let ctx = admission.context_for(OperationKind::ViewSelf)?;

        let user_id = ctx
            .user_id()
            .ok_or_else(|| AppError::unauthenticated("Authentication required"))?;
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(UserView {
            user,
            roles: ctx.roles().clone(),
        })
    }

    pub async fn create_user(
        &self,
        admission: &Admission,
        cmd: CreateUserCommand,
    ) -> AppResult<UserView> {
        admission.context_for(OperationKind::ManageIdentity)?;

        let roles = cmd
            .roles
            .iter()
            .map(RoleName::new)
            .collect::<AppResult<RoleSet>>()?;
        let user = User::new(&cmd.username, HashedPassword::from_plain(&cmd.password)?)?;

        if self.store.find_user_by_username(&user.username).await?.is_some() {
            return Err(AppError::conflict(format!(
                "User '{}' already exists",
                user.username
            )));
        }
        self.store.create_user_with_roles(&user, &roles).await?;

        info!(user_id = %user.id, username = %user.username, roles = ?roles.names(), "User created");
        Ok(UserView { user, roles })
    }

    pub async fn grant_role(
        &self,
        admission: &Admission,
        user_id: UserId,
        role: &str,
    ) -> AppResult<()> {
        let role = self.manage_role(admission, &user_id, role).await?;
        self.store.grant_role(&user_id, &role).await?;
        info!(user_id = %user_id, role = %role, "Role granted");
        Ok(())
    }

    pub async fn revoke_role(
        &self,
        admission: &Admission,
        user_id: UserId,
        role: &str,
    ) -> AppResult<()> {
        let role = self.manage_role(admission, &user_id, role).await?;
        self.store.revoke_role(&user_id, &role).await?;
        info!(user_id = %user_id, role = %role, "Role revoked");
        Ok(())
    }

    async fn manage_role(
        &self,
        admission: &Admission,
        user_id: &UserId,
        role: &str,
    ) -> AppResult<RoleName> {
        admission.context_for(OperationKind::ManageIdentity)?;

        let role = RoleName::new(role)?;
        if self.store.find_user_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }
        Ok(role)
    }

    /// 确保内置角色存在，并按配置创建初始管理员
    pub async fn seed(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        self.store.ensure_role(&RoleName::admin()).await?;
        self.store.ensure_role(&RoleName::creator()).await?;

        let (Some(username), Some(password)) =
            (&bootstrap.admin_username, &bootstrap.admin_password)
        else {
            return Ok(());
        };

        if self.store.find_user_by_username(username.trim()).await?.is_some() {
            return Ok(());
        }

        let user = User::new(username, HashedPassword::from_plain(password.expose_secret())?)?;
        let roles: RoleSet = [RoleName::admin()].into_iter().collect();
        self.store.create_user_with_roles(&user, &roles).await?;

        info!(username = %user.username, "Bootstrap admin created");
        Ok(())
    }
}
