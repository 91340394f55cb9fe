use std::sync::Arc;

use futures::stream::{self, StreamExt};
use quotegate_core::common::{ChartRange, Interval};
use quotegate_core::market::error::MarketError;
use quotegate_core::market::port::MarketDataProvider;
use tracing::{debug, error, info, warn};

use crate::chart::{chart_envelope, empty_chart};
use crate::envelope::{
    ChartEnvelope, MarketSummaryBody, MarketSummaryEnvelope, QuoteEntry, QuoteEnvelope,
    QuoteResponseBody, TrendingEnvelope,
};
use crate::quote::{QuoteViews, degraded_quote, merge_quote, split_symbols};
use crate::summary::{MARKET_INDICES, index_summary, trending};

/// 单次批量报价时同时在途的代码数上限，每个代码会并发两次上游调用
pub const QUOTE_CONCURRENCY: usize = 8;

/// # Summary
/// 行情归一化服务：调用上游数据源并重塑为固定信封。
///
/// # Invariants
/// - 无共享可变状态，可在任意多个请求间并发使用。
/// - 不缓存任何上游结果，每次请求都重新拉取。
pub struct MarketService {
    // 原始行情数据源驱动
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Arc<Self> {
        Arc::new(Self { provider })
    }

    /// # Summary
    /// 获取历史图表。
    ///
    /// # Logic
    /// 1. 解析 `range`（缺失取 1d，非法取 1mo）与 `interval`（缺失或非法取 1d）。
    /// 2. 上游无数据（`NotFound` 或零行）返回带 `error.description` 的空信封。
    /// 3. 其他上游错误原样上抛，由 API 层转换为错误信封。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `range`: 原始 `range` 参数。
    /// * `interval`: 原始 `interval` 参数。
    ///
    /// # Returns
    /// 成功返回图表信封（可能为空信封），传输或解析失败返回 MarketError。
    pub async fn chart(
        &self,
        symbol: &str,
        range: Option<&str>,
        interval: Option<&str>,
    ) -> Result<ChartEnvelope, MarketError> {
        let range = ChartRange::resolve(range);
        let interval = Interval::resolve(interval);

        match self.provider.fetch_history(symbol, range, interval).await {
            Ok(candles) if candles.is_empty() => {
                info!("No history rows for {} ({}/{})", symbol, range, interval);
                Ok(empty_chart())
            }
            Ok(candles) => Ok(chart_envelope(symbol, &candles)),
            Err(MarketError::NotFound) => {
                info!("History not found for {} ({}/{})", symbol, range, interval);
                Ok(empty_chart())
            }
            Err(e) => {
                error!("Chart request failed for {}: {}", symbol, e);
                Err(e)
            }
        }
    }

    /// # Summary
    /// 并发拉取同一证券的详细视图与轻量视图。
    ///
    /// # Logic
    /// 1. 两个视图独立请求，任一失败只记录告警，字段由另一视图或缺省值补齐。
    /// 2. 两者均失败时该证券视为失败，返回详细视图的错误。
    pub async fn fetch_views(&self, symbol: &str) -> Result<QuoteViews, MarketError> {
        let (summary, fast) = futures::join!(
            self.provider.fetch_quote_summary(symbol),
            self.provider.fetch_fast_quote(symbol)
        );

        match (summary, fast) {
            (Err(summary_err), Err(fast_err)) => {
                debug!("Both quote views failed for {}: {} / {}", symbol, summary_err, fast_err);
                Err(summary_err)
            }
            (summary, fast) => {
                if let Err(e) = &summary {
                    warn!("Detailed quote view unavailable for {}: {}", symbol, e);
                }
                if let Err(e) = &fast {
                    warn!("Fast quote view unavailable for {}: {}", symbol, e);
                }
                Ok(QuoteViews {
                    summary: summary.ok(),
                    fast: fast.ok(),
                })
            }
        }
    }

    /// # Summary
    /// 批量报价。
    ///
    /// # Logic
    /// 1. 拆分逗号分隔的代码列表，跳过空段。
    /// 2. 各代码独立处理，最多 `QUOTE_CONCURRENCY` 个同时在途；失败的代码替换为降级条目，不影响同批其他代码。
    /// 3. 输出顺序与输入顺序一致。
    pub async fn quotes(&self, symbols: &str) -> QuoteEnvelope {
        let symbols = split_symbols(symbols);

        let futures: Vec<_> = symbols
            .iter()
            .map(|symbol| async move {
                match self.fetch_views(symbol).await {
                    Ok(views) => QuoteEntry::Full(merge_quote(symbol, &views)),
                    Err(e) => {
                        warn!("Quote failed for {}: {}", symbol, e);
                        degraded_quote(symbol, &e)
                    }
                }
            })
            .collect();
        let entries: Vec<QuoteEntry> = stream::iter(futures)
            .buffered(QUOTE_CONCURRENCY)
            .collect()
            .await;

        QuoteEnvelope {
            quote_response: QuoteResponseBody {
                result: entries,
                error: None,
            },
        }
    }

    /// # Summary
    /// 主要指数概览。
    ///
    /// # Logic
    /// 1. 按固定顺序并发拉取五个指数。
    /// 2. 失败的指数记录日志后直接省略，不放占位条目。
    pub async fn market_summary(&self) -> MarketSummaryEnvelope {
        let futures: Vec<_> = MARKET_INDICES
            .iter()
            .map(|&(symbol, name)| async move { (symbol, name, self.fetch_views(symbol).await) })
            .collect();
        let results: Vec<_> = stream::iter(futures)
            .buffered(QUOTE_CONCURRENCY)
            .collect()
            .await;

        let result = results
            .into_iter()
            .filter_map(|(symbol, name, views)| match views {
                Ok(views) => Some(index_summary(symbol, name, &views)),
                Err(e) => {
                    warn!("Market summary skipped {}: {}", symbol, e);
                    None
                }
            })
            .collect();

        MarketSummaryEnvelope {
            market_summary_response: MarketSummaryBody { result },
        }
    }

    /// 热门代码（静态数据，不访问上游）
    pub fn trending(&self) -> TrendingEnvelope {
        trending()
    }
}
