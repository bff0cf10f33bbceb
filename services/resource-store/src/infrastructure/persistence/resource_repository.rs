//! PostgreSQL 资源仓储
//!
//! 查询条件按固定顺序拼接：先作用域，再搜索，最后排序和分页。

use async_trait::async_trait;
use atrium_adapter_postgres::map_sqlx_error;
use atrium_common::{AuditInfo, PagedResult, UserId};
use atrium_errors::AppResult;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::resource::{
    Resource, ResourceId, ResourceOrdering, ResourceOwner, ResourcePatch, ResourceQuery,
    ResourceRepository, ResourceScope,
};

const SELECT_RESOURCE: &str = r#"
    SELECT r.id, r.owner_id, u.username AS owner_username, r.title, r.data, r.created_at, r.updated_at
    FROM resources r
    INNER JOIN users u ON u.id = r.owner_id
    WHERE TRUE"#;

const COUNT_RESOURCE: &str = "SELECT COUNT(*) FROM resources r WHERE TRUE";

pub struct PostgresResourceRepository {
    pool: PgPool,
}

impl PostgresResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: &ResourceScope) {
    match scope {
        ResourceScope::Nothing => {
            builder.push(" AND FALSE");
        }
        ResourceScope::OwnedBy(user_id) => {
            builder.push(" AND r.owner_id = ").push_bind(user_id.0);
        }
        ResourceScope::All => {}
    }
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &ResourceQuery) {
    push_scope(builder, &query.scope);

    if let Some(term) = query.filter.search_term() {
        builder
            .push(" AND r.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(term)))
            .push(" ESCAPE '\\'");
    }
}

fn order_by(ordering: ResourceOrdering) -> &'static str {
    match ordering {
        ResourceOrdering::CreatedAtAsc => " ORDER BY r.created_at ASC, r.id ASC",
        ResourceOrdering::CreatedAtDesc => " ORDER BY r.created_at DESC, r.id DESC",
        ResourceOrdering::TitleAsc => " ORDER BY r.title ASC, r.id ASC",
        ResourceOrdering::TitleDesc => " ORDER BY r.title DESC, r.id DESC",
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ResourceRepository for PostgresResourceRepository {
    async fn insert(&self, resource: &Resource) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO resources (id, owner_id, title, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(resource.id.0)
        .bind(resource.owner.id.0)
        .bind(&resource.title)
        .bind(Json(&resource.data))
        .bind(resource.audit_info.created_at)
        .bind(resource.audit_info.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find(&self, scope: &ResourceScope, id: &ResourceId) -> AppResult<Option<Resource>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_RESOURCE);
        push_scope(&mut builder, scope);
        builder.push(" AND r.id = ").push_bind(id.0);

        let row = builder
            .build_query_as::<ResourceRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, query: &ResourceQuery) -> AppResult<PagedResult<Resource>> {
        let pagination = &query.filter.pagination;

        let mut count = QueryBuilder::<Postgres>::new(COUNT_RESOURCE);
        push_conditions(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_RESOURCE);
        push_conditions(&mut select, query);
        select
            .push(order_by(query.filter.ordering))
            .push(" LIMIT ")
            .push_bind(pagination.limit() as i64)
            .push(" OFFSET ")
            .push_bind(pagination.offset() as i64);

        let rows = select
            .build_query_as::<ResourceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(PagedResult::new(
            rows.into_iter().map(Into::into).collect(),
            total.max(0) as u64,
            pagination,
        ))
    }

    async fn update(&self, id: &ResourceId, patch: &ResourcePatch) -> AppResult<Option<Resource>> {
        // 未提供的字段由 COALESCE 保留当前行的值
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            WITH updated AS (
                UPDATE resources
                SET title = COALESCE($2, title),
                    data = COALESCE($3, data),
                    updated_at = $4
                WHERE id = $1
                RETURNING id, owner_id, title, data, created_at, updated_at
            )
            SELECT r.id, r.owner_id, u.username AS owner_username, r.title, r.data, r.created_at, r.updated_at
            FROM updated r
            INNER JOIN users u ON u.id = r.owner_id
            "#,
        )
        .bind(id.0)
        .bind(patch.title())
        .bind(patch.data().map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: &ResourceId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ResourceRow {
    id: Uuid,
    owner_id: Uuid,
    owner_username: String,
    title: String,
    data: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Self {
            id: ResourceId::from_uuid(row.id),
            owner: ResourceOwner {
                id: UserId::from_uuid(row.owner_id),
                username: row.owner_username,
            },
            title: row.title,
            data: row.data.0,
            audit_info: AuditInfo {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}
