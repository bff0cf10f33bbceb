//! 数据库迁移，由 `MigrationManager` 按版本顺序执行

use atrium_adapter_postgres::Migration;

const CREATE_IDENTITY_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    username      VARCHAR(150) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_active     BOOLEAN NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS roles (
    id   BIGSERIAL PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role_id BIGINT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, role_id)
);
"#;

const CREATE_RESOURCES: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
    id         UUID PRIMARY KEY,
    owner_id   UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title      VARCHAR(200) NOT NULL,
    data       JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_resources_created_at ON resources (created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_resources_owner_created_at ON resources (owner_id, created_at DESC, id DESC);
"#;

pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_identity_tables", CREATE_IDENTITY_TABLES),
        Migration::new(2, "create_resources", CREATE_RESOURCES),
    ]
}
