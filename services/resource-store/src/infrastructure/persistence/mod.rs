//! PostgreSQL 持久化

pub mod identity_store;
pub mod migrations;
pub mod resource_repository;

pub use identity_store::PostgresIdentityStore;
pub use migrations::migrations;
pub use resource_repository::PostgresResourceRepository;
