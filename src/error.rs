//! 统一错误处理
//!
//! 提供 `ApiError` 枚举实现 `IntoResponse`，替代重复的 `(StatusCode, Json<ErrorResponse>)` 模式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// 统一 API 错误类型
///
/// 工作流内部的 git 失败不走这里（它们作为步骤日志返回给调用方），
/// 只有请求分发层面的失败才映射为 HTTP 错误状态码。
#[derive(Debug)]
pub enum ApiError {
    /// 404 - 资源未找到
    NotFound(String),
    /// 500 - 内部错误
    Internal(String),
}

impl ApiError {
    /// 创建未找到错误
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} not found", resource),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorResponse::new(error_type, message);
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(r) => write!(f, "Not found: {}", r),
            ApiError::Internal(m) => write!(f, "Internal error: {}", m),
        }
    }
}

impl std::error::Error for ApiError {}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_new() {
        let resp = ErrorResponse::new("test_error", "Test message");
        assert_eq!(resp.error, "test_error");
        assert_eq!(resp.message, "Test message");
    }

    #[test]
    fn test_not_found_display() {
        let err = ApiError::not_found("HTML file");
        assert_eq!(err.to_string(), "Not found: HTML file");
    }
}
