//! atrium-bootstrap - 统一服务启动骨架
//!
//! 配置 → 日志 → 基础设施 → 路由 → 带 graceful shutdown 的 HTTP 服务

mod infrastructure;
mod retry;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
