//! 资源领域模块

pub mod query;
pub mod repository;
pub mod resource;
pub mod scope;

pub use query::{ResourceFilter, ResourceOrdering, ResourceQuery};
pub use repository::ResourceRepository;
pub use resource::{Resource, ResourceId, ResourceOwner, ResourcePatch, validate_title};
pub use scope::ResourceScope;
