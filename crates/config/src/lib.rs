//! atrium-config - 配置加载库
//!
//! 加载顺序：`default.toml` → `{APP_ENV}.toml` → `ATRIUM_` 前缀环境变量（`__` 分隔层级）

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

/// JWT 密钥最小长度
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_expires_in() -> u64 {
    3600
}

fn default_issuer() -> String {
    "atrium".to_string()
}

fn default_audience() -> String {
    "atrium-api".to_string()
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_enabled: false,
        }
    }
}

/// 列表分页配置
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// 启动初始化配置（可选的初始管理员账号）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<Secret<String>>,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default = "default_server")]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

fn default_app_name() -> String {
    "atrium".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("ATRIUM_").split("__"));

        Self::from_figment(figment)
    }

    /// 从任意 Figment 提取并校验配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验安全相关配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "jwt.secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }

        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(ConfigError::Invalid(
                "pagination.default_page_size must be between 1 and max_page_size".to_string(),
            ));
        }

        if self.bootstrap.admin_username.is_some() != self.bootstrap.admin_password.is_some() {
            return Err(ConfigError::Invalid(
                "bootstrap.admin_username and bootstrap.admin_password must be set together"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
