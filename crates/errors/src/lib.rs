//! atrium-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
        }
    }

    /// 是否为服务端错误（细节不对外暴露）
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        let detail = if self.is_server_error() {
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };
        ProblemDetails {
            r#type: self.problem_type().to_string(),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail,
            instance: None,
        }
    }

    fn problem_type(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "/problems/not-found",
            Self::Validation(_) => "/problems/validation",
            Self::Unauthenticated(_) => "/problems/unauthenticated",
            Self::Forbidden(_) => "/problems/forbidden",
            Self::Conflict(_) => "/problems/conflict",
            Self::Internal(_) => "/problems/internal",
            Self::Database(_) => "/problems/database",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::Unauthenticated(_) => "Unauthenticated",
            Self::Forbidden(_) => "Forbidden",
            Self::Conflict(_) => "Conflict",
            Self::Internal(_) => "Internal Server Error",
            Self::Database(_) => "Database Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "Request failed with server error");
        }

        let problem = self.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_vec(&problem).unwrap_or_default();

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            body,
        )
            .into_response()
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
