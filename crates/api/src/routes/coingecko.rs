use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::server::AppState;

/// # Summary
/// `GET /api/coingecko/{path...}?...` 原样透传。
///
/// # Arguments
/// * `path`: 去除 `coingecko/` 后的剩余路径。
/// * `query`: 原始查询串，不做解码。
///
/// # Returns
/// 上游 JSON 原文；超时、非 2xx 或非 JSON 响应返回 500。
pub async fn passthrough(
    state: &AppState,
    path: &str,
    query: Option<&str>,
) -> Result<Json<Value>, ApiError> {
    let body = state.relay.forward(path, query).await?;
    Ok(Json(body))
}
