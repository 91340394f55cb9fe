use crate::envelope::{IndexSummary, TrendingEnvelope, TrendingFinance, TrendingQuote, TrendingResult};
use crate::quote::QuoteViews;

/// 市场概览固定展示的指数及其显示名称（顺序即输出顺序）
pub const MARKET_INDICES: [(&str, &str); 5] = [
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
    ("^RUT", "Russell 2000"),
    ("^VIX", "VIX"),
];

/// 热门代码，纯静态数据
pub const TRENDING_SYMBOLS: [&str; 8] = ["AAPL", "TSLA", "NVDA", "AMD", "GOOGL", "MSFT", "META", "AMZN"];

/// 由合并后的视图构造单个指数条目，名称固定取自 `MARKET_INDICES`
pub fn index_summary(symbol: &str, name: &str, views: &QuoteViews) -> IndexSummary {
    let (change, change_percent) = views.change();
    IndexSummary {
        symbol: symbol.to_string(),
        short_name: name.to_string(),
        regular_market_price: views.price(),
        regular_market_change: change,
        regular_market_change_percent: change_percent,
    }
}

pub fn trending() -> TrendingEnvelope {
    TrendingEnvelope {
        finance: TrendingFinance {
            result: vec![TrendingResult {
                quotes: TRENDING_SYMBOLS
                    .iter()
                    .map(|symbol| TrendingQuote {
                        symbol: symbol.to_string(),
                    })
                    .collect(),
            }],
        },
    }
}
