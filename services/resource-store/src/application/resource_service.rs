//! 资源服务
//!
//! 处理器先通过 `admit` 完成请求级检查，再解析输入并调用具体操作；
//! 操作内部经作用域访问存储，加载到对象后执行对象级检查。

use std::sync::Arc;

use atrium_common::PagedResult;
use atrium_config::PaginationConfig;
use atrium_errors::{AppError, AppResult};
use metrics::counter;
use tracing::info;

use super::authorizer::{Admission, Authorizer};
use super::commands::{
    CreateResourceCommand, ListResourcesQuery, ReplaceResourceCommand, UpdateResourceCommand,
};
use crate::domain::identity::Actor;
use crate::domain::policy::{AuthContext, OperationKind};
use crate::domain::resource::{
    Resource, ResourceId, ResourcePatch, ResourceQuery, ResourceRepository, ResourceScope,
};

const NOT_FOUND: &str = "No Resource matches the given query.";

pub struct ResourceService {
    resources: Arc<dyn ResourceRepository>,
    authorizer: Arc<Authorizer>,
    pagination: PaginationConfig,
}

impl ResourceService {
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        authorizer: Arc<Authorizer>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            resources,
            authorizer,
            pagination,
        }
    }

    pub async fn admit(&self, actor: &Actor, op: OperationKind) -> AppResult<Admission> {
        self.authorizer.admit(actor, op).await
    }

    pub async fn create(
        &self,
        admission: &Admission,
        cmd: CreateResourceCommand,
    ) -> AppResult<Resource> {
        let ctx = admission.context_for(OperationKind::Create)?;
        let principal = ctx
            .principal()
            .ok_or_else(|| AppError::unauthenticated("Authentication required"))?;

        let (title, data) = cmd.into_parts()?;
        let resource = Resource::new(principal, &title, data)?;
        self.resources.insert(&resource).await?;

        info!(resource_id = %resource.id, owner = %resource.owner.id, "Resource created");
        record_mutation(OperationKind::Create);
        Ok(resource)
    }

    pub async fn list(
        &self,
        admission: &Admission,
        query: ListResourcesQuery,
    ) -> AppResult<PagedResult<Resource>> {
        let ctx = admission.context_for(OperationKind::List)?;

        let filter = query.to_filter(&self.pagination);
        let page = filter.pagination.page;
        if page == 0 {
            return Err(AppError::not_found("Invalid page."));
        }

        let query = ResourceQuery::new(ResourceScope::for_actor(ctx), filter);
        let result = self.resources.list(&query).await?;

        // 空结果集只有第 1 页
        if page > 1 && page > result.total_pages() {
            return Err(AppError::not_found("Invalid page."));
        }
        Ok(result)
    }

    pub async fn retrieve(&self, admission: &Admission, id: ResourceId) -> AppResult<Resource> {
        let ctx = admission.context_for(OperationKind::Retrieve)?;
        self.load(OperationKind::Retrieve, ctx, &id).await
    }

    pub async fn update(
        &self,
        admission: &Admission,
        cmd: UpdateResourceCommand,
    ) -> AppResult<Resource> {
        let ctx = admission.context_for(OperationKind::Update)?;
        self.load(OperationKind::Update, ctx, &cmd.id).await?;

        let resource = self.save(&cmd.id, &cmd.to_patch()?).await?;
        info!(resource_id = %resource.id, "Resource updated");
        record_mutation(OperationKind::Update);
        Ok(resource)
    }

    pub async fn replace(
        &self,
        admission: &Admission,
        cmd: ReplaceResourceCommand,
    ) -> AppResult<Resource> {
        let ctx = admission.context_for(OperationKind::Update)?;
        self.load(OperationKind::Update, ctx, &cmd.id).await?;

        let resource = self.save(&cmd.id, &cmd.to_patch()?).await?;
        info!(resource_id = %resource.id, "Resource replaced");
        record_mutation(OperationKind::Update);
        Ok(resource)
    }

    pub async fn delete(&self, admission: &Admission, id: ResourceId) -> AppResult<()> {
        let ctx = admission.context_for(OperationKind::Delete)?;

        let resource = self.load(OperationKind::Delete, ctx, &id).await?;
        if !self.resources.delete(&resource.id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }

        info!(resource_id = %resource.id, "Resource deleted");
        record_mutation(OperationKind::Delete);
        Ok(())
    }

    /// 经作用域加载对象：不存在与作用域外同样返回 NotFound
    async fn load(
        &self,
        op: OperationKind,
        ctx: &AuthContext,
        id: &ResourceId,
    ) -> AppResult<Resource> {
        let scope = ResourceScope::for_actor(ctx);
        let resource = self
            .resources
            .find(&scope, id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

        self.authorizer.require_object(op, ctx, &resource)?;
        Ok(resource)
    }

    /// 加载与写入之间被删除时同样返回 NotFound
    async fn save(&self, id: &ResourceId, patch: &ResourcePatch) -> AppResult<Resource> {
        self.resources
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }
}

fn record_mutation(op: OperationKind) {
    counter!("resource_mutations_total", "operation" => op.as_str()).increment(1);
}
