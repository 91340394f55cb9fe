//! # 报价合并规则
//!
//! 每个字段按"轻量视图 → 详细视图 → 缺省值"的顺序取值：
//!
//! | 字段 | 来源 | 缺省 |
//! |------|------|------|
//! | regularMarketPrice / PreviousClose / Open / DayHigh / DayLow | fast → detail | 0 |
//! | regularMarketVolume / marketCap / fiftyTwoWeekHigh / fiftyTwoWeekLow | fast → detail | 0 |
//! | regularMarketChange / ChangePercent | detail → 由 fast 价格推算 | 0 |
//! | shortName / longName | detail | 代码本身 |
//! | currency | detail | `USD` |
//! | exchange | detail | 空串 |
//! | quoteType | detail | `EQUITY` |

use quotegate_core::market::entity::{FastQuote, QuoteSummary};
use quotegate_core::market::error::MarketError;

use crate::envelope::{DegradedQuote, QuoteEntry, QuoteRecord};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_QUOTE_TYPE: &str = "EQUITY";

/// # Summary
/// 同一证券的两种上游视图。
///
/// # Invariants
/// - 至少有一个视图非空，两者皆失败的证券不会构造此结构。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteViews {
    pub summary: Option<QuoteSummary>,
    pub fast: Option<FastQuote>,
}

impl QuoteViews {
    fn live(
        &self,
        fast: fn(&FastQuote) -> Option<f64>,
        detail: fn(&QuoteSummary) -> Option<f64>,
    ) -> Option<f64> {
        self.fast
            .as_ref()
            .and_then(fast)
            .or_else(|| self.summary.as_ref().and_then(detail))
    }

    fn text(&self, detail: fn(&QuoteSummary) -> Option<&String>) -> Option<String> {
        self.summary.as_ref().and_then(detail).cloned()
    }

    /// 最新价
    pub fn price(&self) -> f64 {
        self.live(|f| f.last_price, |s| s.regular_market_price)
            .unwrap_or_default()
    }

    /// # Summary
    /// 涨跌额与涨跌幅。
    ///
    /// # Logic
    /// 1. 详细视图提供时直接采用。
    /// 2. 否则用轻量视图的最新价与前收盘价推算；前收盘为 0 时涨跌幅记为 0。
    pub fn change(&self) -> (f64, f64) {
        let computed = self.fast.as_ref().and_then(|f| {
            let price = f.last_price?;
            let previous = f.previous_close?;
            let change = price - previous;
            let percent = if previous == 0.0 { 0.0 } else { change / previous * 100.0 };
            Some((change, percent))
        });

        let change = self
            .summary
            .as_ref()
            .and_then(|s| s.regular_market_change)
            .or(computed.map(|(c, _)| c))
            .unwrap_or_default();
        let percent = self
            .summary
            .as_ref()
            .and_then(|s| s.regular_market_change_percent)
            .or(computed.map(|(_, p)| p))
            .unwrap_or_default();
        (change, percent)
    }
}

/// # Summary
/// 合并两种视图为完整报价记录。
///
/// # Arguments
/// * `symbol`: 请求中的证券代码（原样回显）。
/// * `views`: 上游视图。
///
/// # Returns
/// 字段缺失一律按模块文档中的规则替换为缺省值。
pub fn merge_quote(symbol: &str, views: &QuoteViews) -> QuoteRecord {
    let (change, change_percent) = views.change();
    let volume = views
        .fast
        .as_ref()
        .and_then(|f| f.last_volume)
        .or_else(|| views.summary.as_ref().and_then(|s| s.regular_market_volume))
        .unwrap_or_default();

    QuoteRecord {
        symbol: symbol.to_string(),
        short_name: views.text(|s| s.short_name.as_ref()).unwrap_or_else(|| symbol.to_string()),
        long_name: views.text(|s| s.long_name.as_ref()).unwrap_or_else(|| symbol.to_string()),
        regular_market_price: views.price(),
        regular_market_change: change,
        regular_market_change_percent: change_percent,
        regular_market_previous_close: views
            .live(|f| f.previous_close, |s| s.regular_market_previous_close)
            .unwrap_or_default(),
        regular_market_open: views
            .live(|f| f.open, |s| s.regular_market_open)
            .unwrap_or_default(),
        regular_market_day_high: views
            .live(|f| f.day_high, |s| s.regular_market_day_high)
            .unwrap_or_default(),
        regular_market_day_low: views
            .live(|f| f.day_low, |s| s.regular_market_day_low)
            .unwrap_or_default(),
        regular_market_volume: volume,
        market_cap: views
            .live(|f| f.market_cap, |s| s.market_cap)
            .unwrap_or_default(),
        fifty_two_week_high: views
            .live(|f| f.year_high, |s| s.fifty_two_week_high)
            .unwrap_or_default(),
        fifty_two_week_low: views
            .live(|f| f.year_low, |s| s.fifty_two_week_low)
            .unwrap_or_default(),
        currency: views
            .text(|s| s.currency.as_ref())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        exchange: views.text(|s| s.exchange.as_ref()).unwrap_or_default(),
        quote_type: views
            .text(|s| s.quote_type.as_ref())
            .unwrap_or_else(|| DEFAULT_QUOTE_TYPE.to_string()),
    }
}

/// 为失败的代码构造降级条目
pub fn degraded_quote(symbol: &str, err: &MarketError) -> QuoteEntry {
    QuoteEntry::Degraded(DegradedQuote {
        symbol: symbol.to_string(),
        short_name: symbol.to_string(),
        regular_market_price: 0.0,
        error: err.to_string(),
    })
}

/// # Summary
/// 拆分逗号分隔的代码列表。
///
/// # Logic
/// 1. 按 `,` 切分并去除两端空白。
/// 2. 跳过空段，保持输入顺序，不去重。
pub fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
