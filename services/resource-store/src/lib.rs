//! Resource Store Service Library
//!
//! 模块化架构：
//! - `domain`: 身份与角色、授权策略（RoleGate / OwnershipGate）、资源与可见范围
//! - `application`: 资源服务与身份服务（编排授权与存储）
//! - `infrastructure`: PostgreSQL 与内存存储实现
//! - `api`: HTTP 传输层（axum）

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod startup;
