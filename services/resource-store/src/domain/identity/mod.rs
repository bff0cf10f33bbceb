//! 身份与角色领域模块

pub mod repository;
pub mod role;
pub mod user;

pub use repository::IdentityStore;
pub use role::{ADMIN_ROLE, CREATOR_ROLE, RoleName, RoleSet};
pub use user::{Actor, Principal, User};
