//! 授权策略引擎
//!
//! - 请求级：`RoleGate`，操作者是否持有该类操作要求的任一角色
//! - 对象级：`OwnershipGate`，操作者是否为对象所有者或持有提升角色
//!
//! 两者只返回抽象的判定结果，不涉及传输层状态码。

pub mod context;
pub mod engine;
pub mod gate;
pub mod table;

pub use context::AuthContext;
pub use engine::{Denial, PolicyEngine};
pub use gate::{Access, OwnershipGate, Owned, RoleGate};
pub use table::{CREATOR_ROLES, ELEVATED_ROLES, Gate, OperationKind};
