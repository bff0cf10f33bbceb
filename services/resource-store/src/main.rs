//! Resource Store Service - 服务入口

use atrium_bootstrap::run_http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    run_http("config", |infra| async move { resource_store::startup::build_app(infra).await }).await
}
