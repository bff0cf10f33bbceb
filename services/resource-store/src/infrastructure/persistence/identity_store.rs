//! PostgreSQL 身份与角色存储

use async_trait::async_trait;
use atrium_adapter_postgres::map_sqlx_error;
use atrium_auth_core::HashedPassword;
use atrium_common::UserId;
use atrium_errors::AppResult;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::identity::{IdentityStore, RoleName, RoleSet, User};

pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_user(conn: &mut PgConnection, user: &User) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user.id.0)
    .bind(&user.username)
    .bind(user.password_hash.as_str())
    .bind(user.is_active)
    .bind(user.created_at)
    .execute(conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

/// 角色不存在时先创建，已有的成员关系保持不变
async fn insert_membership(
    conn: &mut PgConnection,
    user_id: &UserId,
    role: &RoleName,
) -> AppResult<()> {
    sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(role.as_str())
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = $2
        ON CONFLICT (user_id, role_id) DO NOTHING
        "#,
    )
    .bind(user_id.0)
    .bind(role.as_str())
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, is_active, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        insert_user(&mut conn, user).await
    }

    async fn create_user_with_roles(&self, user: &User, roles: &RoleSet) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        insert_user(&mut tx, user).await?;
        for role in roles.iter() {
            insert_membership(&mut tx, &user.id, role).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn roles_of(&self, user_id: &UserId) -> AppResult<RoleSet> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        names.into_iter().map(RoleName::new).collect()
    }

    async fn ensure_role(&self, role: &RoleName) -> AppResult<()> {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn grant_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        insert_membership(&mut tx, user_id, role).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn revoke_role(&self, user_id: &UserId, role: &RoleName) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM user_roles ur
            USING roles r
            WHERE ur.role_id = r.id AND ur.user_id = $1 AND r.name = $2
            "#,
        )
        .bind(user_id.0)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            password_hash: HashedPassword::from_hash(row.password_hash),
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}
