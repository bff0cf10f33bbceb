//! 应用层模块

pub mod authorizer;
pub mod commands;
pub mod identity_service;
pub mod resource_service;

pub use authorizer::{Admission, Authorizer};
pub use commands::{
    CreateResourceCommand, CreateUserCommand, ListResourcesQuery, ReplaceResourceCommand,
    UpdateResourceCommand,
};
pub use identity_service::{IdentityService, IssuedToken, UserView};
pub use resource_service::ResourceService;
