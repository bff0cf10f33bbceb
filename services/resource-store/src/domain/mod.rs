//! 领域层

pub mod identity;
pub mod policy;
pub mod resource;
