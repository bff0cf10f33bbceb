//! 服务启动器

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use atrium_config::AppConfig;
use atrium_errors::AppResult;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 所有服务的统一入口：
/// 1. 加载配置
/// 2. 初始化日志
/// 3. 创建基础设施资源（数据库、TokenService、metrics）
/// 4. 调用 `router_builder` 构建路由（迁移、数据初始化也在其中完成）
/// 5. 启动服务器并处理 graceful shutdown
///
/// ```ignore
/// run_http("config", |infra| async move { build_app(infra).await }).await
/// ```
pub async fn run_http<F, Fut>(
    config_dir: &str,
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let infra = Infrastructure::from_config(config).await?;
    let app = router_builder(infra)
        .await?
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}
