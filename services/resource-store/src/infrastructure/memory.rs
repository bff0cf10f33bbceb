//! 内存存储
//!
//! 同时实现 `IdentityStore` 与 `ResourceRepository`，用于测试和本地运行。

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use atrium_common::{PagedResult, UserId};
use atrium_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::identity::{IdentityStore, RoleName, RoleSet, User};
use crate::domain::resource::{
    Resource, ResourceId, ResourceOwner, ResourcePatch, ResourceQuery, ResourceRepository,
    ResourceScope,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    roles: BTreeSet<RoleName>,
    user_roles: HashMap<UserId, RoleSet>,
    resources: HashMap<ResourceId, Resource>,
}

impl State {
    /// 所有者用户名以用户表为准
    fn with_owner(&self, resource: &Resource) -> Resource {
        let mut resource = resource.clone();
        if let Some(user) = self.users.get(&resource.owner.id) {
            resource.owner = ResourceOwner {
                id: user.id,
                username: user.username.clone(),
            };
        }
        resource
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::conflict("Duplicate entry violates unique constraint"));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn create_user_with_roles(&self, user: &User, roles: &RoleSet) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::conflict("Duplicate entry violates unique constraint"));
        }
        state.users.insert(user.id, user.clone());
        state.roles.extend(roles.iter().cloned());
        state.user_roles.insert(user.id, roles.clone());
        Ok(())
    }

    async fn roles_of(&self, user_id: &UserId) -> AppResult<RoleSet> {
        let state = self.state.read().await;
        Ok(state.user_roles.get(user_id).cloned().unwrap_or_default())
    }

    async fn ensure_role(&self, role: &RoleName) -> AppResult<()> {
        self.state.write().await.roles.insert(role.clone());
        Ok(())
    }

    async fn grant_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(user_id) {
            return Err(AppError::not_found("User not found"));
        }
        state.roles.insert(role.clone());
        state
            .user_roles
            .entry(*user_id)
            .or_default()
            .insert(role.clone());
        Ok(())
    }

    async fn revoke_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(roles) = state.user_roles.get_mut(user_id) {
            roles.remove(role);
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository for InMemoryStore {
    async fn insert(&self, resource: &Resource) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.resources.contains_key(&resource.id) {
            return Err(AppError::conflict("Duplicate entry violates unique constraint"));
        }
        state.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    async fn find(&self, scope: &ResourceScope, id: &ResourceId) -> AppResult<Option<Resource>> {
        let state = self.state.read().await;
        Ok(state
            .resources
            .get(id)
            .filter(|r| scope.admits(r))
            .map(|r| state.with_owner(r)))
    }

    async fn list(&self, query: &ResourceQuery) -> AppResult<PagedResult<Resource>> {
        let state = self.state.read().await;

        let mut items: Vec<Resource> = state
            .resources
            .values()
            .filter(|r| query.scope.admits(r))
            .filter(|r| query.filter.matches(r))
            .map(|r| state.with_owner(r))
            .collect();
        items.sort_by(|a, b| query.filter.ordering.compare(a, b));

        let pagination = &query.filter.pagination;
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok(PagedResult::new(items, total, pagination))
    }

    async fn update(&self, id: &ResourceId, patch: &ResourcePatch) -> AppResult<Option<Resource>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.resources.get_mut(id) else {
            return Ok(None);
        };
        stored.apply(patch);
        let updated = stored.clone();
        Ok(Some(state.with_owner(&updated)))
    }

    async fn delete(&self, id: &ResourceId) -> AppResult<bool> {
        Ok(self.state.write().await.resources.remove(id).is_some())
    }
}
