//! # API 统一错误处理
//!
//! 将下层错误映射到 HTTP 状态码与 `{ "error": ... }` 响应体。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quotegate_core::market::error::MarketError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 未知接口 (404)
    #[error("Unknown API endpoint: {0}")]
    NotFound(String),

    /// 不支持的请求方法 (405)
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// 上游或处理失败 (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(msg) = &self {
            tracing::error!("Request failed: {}", msg);
        }
        let body = Json(ApiErrorResponse::from_msg(self.to_string()));
        (status, body).into_response()
    }
}

/// 从 `MarketError` 转换，错误信息原样透出
impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
