//! 资源仓储接口

use async_trait::async_trait;
use atrium_common::PagedResult;
use atrium_errors::AppResult;

use super::query::ResourceQuery;
use super::resource::{Resource, ResourceId, ResourcePatch};
use super::scope::ResourceScope;

/// 资源存储
///
/// 所有读取都经过 `ResourceScope`：作用域外的对象与不存在的对象不可区分。
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn insert(&self, resource: &Resource) -> AppResult<()>;

    /// 作用域内按 ID 查找
    async fn find(&self, scope: &ResourceScope, id: &ResourceId) -> AppResult<Option<Resource>>;

    /// 先应用作用域，再过滤、排序、分页
    async fn list(&self, query: &ResourceQuery) -> AppResult<PagedResult<Resource>>;

    /// 原子地应用修改并刷新 `updated_at`，返回更新后的资源；记录不存在时返回 `None`
    ///
    /// 读改写在存储内完成，并发的部分更新不会互相覆盖未涉及的字段。
    async fn update(&self, id: &ResourceId, patch: &ResourcePatch) -> AppResult<Option<Resource>>;

    async fn delete(&self, id: &ResourceId) -> AppResult<bool>;
}
