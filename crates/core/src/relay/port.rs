use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 外部 JSON 接口透传契约。
///
/// # Invariants
/// - 路径与查询串按原样拼接到固定上游主机，不做任何改写。
/// - 响应体必须是合法 JSON，否则视为失败。
#[async_trait]
pub trait JsonRelay: Send + Sync {
    /// # Summary
    /// 将请求转发至上游并返回解析后的 JSON。
    ///
    /// # Arguments
    /// * `path`: 去除本地前缀后的剩余路径。
    /// * `query`: 原始查询串（不含 `?`），为空时不附加。
    ///
    /// # Returns
    /// 成功返回上游 JSON 原文，失败返回 MarketError。
    async fn forward(&self, path: &str, query: Option<&str>) -> Result<serde_json::Value, MarketError>;
}
