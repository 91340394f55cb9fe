use crate::common::{ChartRange, Interval};
use crate::market::entity::{Candle, FastQuote, QuoteSummary, SearchHit};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每次调用只发起一次上游请求，不做重试。
/// - 所有调用都必须受显式超时约束。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在指定区间与采样间隔下的历史 K 线。
    ///
    /// # Logic
    /// 1. 构建带 `range` / `interval` 的数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 丢弃任一 OHLCV 字段为空的样本。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `range`: 回溯区间。
    /// * `interval`: 采样间隔。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表；上游明确无数据时返回 `MarketError::NotFound`。
    async fn fetch_history(
        &self,
        symbol: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<Vec<Candle>, MarketError>;

    /// # Summary
    /// 获取证券的详细资料视图（名称、币种、交易所、涨跌幅等）。
    ///
    /// # Returns
    /// 成功返回 `QuoteSummary`，上游无此证券时返回 `MarketError::NotFound`。
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketError>;

    /// # Summary
    /// 获取证券的轻量实时价格视图。
    async fn fetch_fast_quote(&self, symbol: &str) -> Result<FastQuote, MarketError>;

    /// # Summary
    /// 获取与证券相关的近期新闻原始条目。
    ///
    /// # Logic
    /// 1. 新闻条目的结构因上游版本而异，此处不做解析，原样返回 JSON。
    ///
    /// # Returns
    /// 成功返回原始 JSON 条目列表。
    async fn fetch_news(&self, symbol: &str) -> Result<Vec<serde_json::Value>, MarketError>;

    /// # Summary
    /// 调用上游全文检索接口搜索证券。
    ///
    /// # Returns
    /// 成功返回上游原始排序的候选列表。
    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchHit>, MarketError>;
}
