use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，记录特定时段内的行情波动。
///
/// # Invariants
/// - 由 Feed 层产出时五个价格/成交量字段均已确定，不含空值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: u64,
}

/// # Summary
/// 证券详细资料视图（上游 quote 接口的单条记录）。
///
/// # Invariants
/// - 所有字段均可能缺失，缺省值由 Normalizer 统一替换，不在此处填充。
/// - 字段名保持上游 camelCase 命名，以便直接反序列化。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSummary {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// # Summary
/// 轻量实时价格视图，由图表元数据推导而来。
///
/// # Invariants
/// - 仅承载实时价格类字段，描述性字段一律由 `QuoteSummary` 提供。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastQuote {
    // 最新成交价
    pub last_price: Option<f64>,
    // 前收盘价
    pub previous_close: Option<f64>,
    // 当日开盘价
    pub open: Option<f64>,
    // 当日最高价
    pub day_high: Option<f64>,
    // 当日最低价
    pub day_low: Option<f64>,
    // 当日成交量
    pub last_volume: Option<u64>,
    // 总市值
    pub market_cap: Option<f64>,
    // 52 周最高
    pub year_high: Option<f64>,
    // 52 周最低
    pub year_low: Option<f64>,
}

/// # Summary
/// 上游全文检索返回的单个候选标的。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchHit {
    pub symbol: String,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
    pub score: Option<f64>,
}
