//! # 响应 DTO

use serde::{Deserialize, Serialize};

/// 统一错误信封 `{ "error": <message> }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
