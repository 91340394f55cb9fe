//! # 响应信封
//!
//! 所有结构的字段名与嵌套层级都是与前端约定的兼容契约（沿用 Yahoo Finance
//! 公开接口的 JSON 形状），不可随意调整。每次请求新建，构造后不再修改。

use serde::{Deserialize, Serialize};

// ============================================================
//  Chart
// ============================================================

/// `GET /api/yahoo/chart/{symbol}` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

/// # Invariants
/// - `result` 与 `error` 恰有一个非空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartSeries>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartError {
    pub description: String,
}

/// # Invariants
/// - `timestamp` 与 `indicators.quote[0]` 中五个序列等长且按下标对齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub meta: ChartMeta,
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: String,
    // 最近一根 K 线的收盘价
    pub regular_market_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartIndicators {
    pub quote: Vec<OhlcvSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
}

// ============================================================
//  Quote
// ============================================================

/// `GET /api/yahoo/quote?symbols=` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResponseBody,
}

/// # Invariants
/// - `result` 长度等于非空输入代码个数，顺序与输入一致。
/// - `error` 恒为 null，单个代码的失败体现在对应条目中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponseBody {
    pub result: Vec<QuoteEntry>,
    pub error: Option<String>,
}

/// 批量报价中的一项：完整报价或降级条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteEntry {
    Full(QuoteRecord),
    Degraded(DegradedQuote),
}

impl QuoteEntry {
    pub fn symbol(&self) -> &str {
        match self {
            QuoteEntry::Full(record) => &record.symbol,
            QuoteEntry::Degraded(degraded) => &degraded.symbol,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, QuoteEntry::Degraded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub symbol: String,
    pub short_name: String,
    pub long_name: String,
    pub regular_market_price: f64,
    pub regular_market_change: f64,
    pub regular_market_change_percent: f64,
    pub regular_market_previous_close: f64,
    pub regular_market_open: f64,
    pub regular_market_day_high: f64,
    pub regular_market_day_low: f64,
    pub regular_market_volume: u64,
    pub market_cap: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub currency: String,
    pub exchange: String,
    pub quote_type: String,
}

/// 上游两种视图均失败时的占位条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradedQuote {
    pub symbol: String,
    pub short_name: String,
    pub regular_market_price: f64,
    pub error: String,
}

// ============================================================
//  Market summary / Trending
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummaryEnvelope {
    #[serde(rename = "marketSummaryResponse")]
    pub market_summary_response: MarketSummaryBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummaryBody {
    pub result: Vec<IndexSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub symbol: String,
    pub short_name: String,
    pub regular_market_price: f64,
    pub regular_market_change: f64,
    pub regular_market_change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEnvelope {
    pub finance: TrendingFinance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingFinance {
    pub result: Vec<TrendingResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingResult {
    pub quotes: Vec<TrendingQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingQuote {
    pub symbol: String,
}
