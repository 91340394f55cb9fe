//! # 测试替身
//!
//! 供下游 crate 集成测试使用的内存实现，通过 `test-utils` feature 开启。

use crate::common::{ChartRange, Interval};
use crate::market::entity::{Candle, FastQuote, QuoteSummary, SearchHit};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use crate::relay::port::JsonRelay;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// # Summary
/// 基于预设响应的行情提供者。
///
/// # Invariants
/// - 未预设的证券一律返回 `MarketError::NotFound`。
/// - 每次调用都会累加 `calls` 计数，便于断言"未发起上游请求"。
/// - 设置 `latency` 后每次调用先等待该时长，并记录同时在途调用数的峰值。
#[derive(Default)]
pub struct StubMarketProvider {
    history: DashMap<String, Result<Vec<Candle>, MarketError>>,
    summaries: DashMap<String, Result<QuoteSummary, MarketError>>,
    fast_quotes: DashMap<String, Result<FastQuote, MarketError>>,
    news: DashMap<String, Result<Vec<serde_json::Value>, MarketError>>,
    search_hits: DashMap<String, Result<Vec<SearchHit>, MarketError>>,
    calls: AtomicUsize,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubMarketProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(self, symbol: &str, result: Result<Vec<Candle>, MarketError>) -> Self {
        self.history.insert(symbol.to_string(), result);
        self
    }

    pub fn with_summary(self, symbol: &str, result: Result<QuoteSummary, MarketError>) -> Self {
        self.summaries.insert(symbol.to_string(), result);
        self
    }

    pub fn with_fast_quote(self, symbol: &str, result: Result<FastQuote, MarketError>) -> Self {
        self.fast_quotes.insert(symbol.to_string(), result);
        self
    }

    pub fn with_news(
        self,
        symbol: &str,
        result: Result<Vec<serde_json::Value>, MarketError>,
    ) -> Self {
        self.news.insert(symbol.to_string(), result);
        self
    }

    pub fn with_search(self, query: &str, result: Result<Vec<SearchHit>, MarketError>) -> Self {
        self.search_hits.insert(query.to_string(), result);
        self
    }

    /// 以同一价格同时预设两种报价视图
    pub fn with_listed(self, symbol: &str, name: &str, price: f64) -> Self {
        let summary = QuoteSummary {
            symbol: Some(symbol.to_string()),
            short_name: Some(name.to_string()),
            long_name: Some(name.to_string()),
            currency: Some("USD".to_string()),
            exchange: Some("NMS".to_string()),
            quote_type: Some("EQUITY".to_string()),
            regular_market_price: Some(price),
            regular_market_change: Some(1.5),
            regular_market_change_percent: Some(0.75),
            ..QuoteSummary::default()
        };
        let fast = FastQuote {
            last_price: Some(price),
            previous_close: Some(price - 1.5),
            ..FastQuote::default()
        };
        self.with_summary(symbol, Ok(summary))
            .with_fast_quote(symbol, Ok(fast))
    }

    /// 每次调用的模拟上游耗时
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 已发生的上游调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 同时在途调用数的历史峰值
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn lookup<T: Clone>(
        &self,
        map: &DashMap<String, Result<T, MarketError>>,
        key: &str,
    ) -> Result<T, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        map.get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or(Err(MarketError::NotFound))
    }
}

#[async_trait]
impl MarketDataProvider for StubMarketProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        _range: ChartRange,
        _interval: Interval,
    ) -> Result<Vec<Candle>, MarketError> {
        self.lookup(&self.history, symbol).await
    }

    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketError> {
        self.lookup(&self.summaries, symbol).await
    }

    async fn fetch_fast_quote(&self, symbol: &str) -> Result<FastQuote, MarketError> {
        self.lookup(&self.fast_quotes, symbol).await
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<serde_json::Value>, MarketError> {
        self.lookup(&self.news, symbol).await
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchHit>, MarketError> {
        self.lookup(&self.search_hits, query).await
    }
}

/// # Summary
/// 记录转发请求并返回固定响应的透传替身。
pub struct StubRelay {
    response: Result<serde_json::Value, MarketError>,
    forwarded: Mutex<Vec<(String, Option<String>)>>,
}

impl StubRelay {
    pub fn new(response: Result<serde_json::Value, MarketError>) -> Self {
        Self {
            response,
            forwarded: Mutex::new(Vec::new()),
        }
    }

    /// 已转发的 (path, query) 列表
    pub fn forwarded(&self) -> Vec<(String, Option<String>)> {
        self.forwarded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl JsonRelay for StubRelay {
    async fn forward(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<serde_json::Value, MarketError> {
        if let Ok(mut guard) = self.forwarded.lock() {
            guard.push((path.to_string(), query.map(str::to_string)));
        }
        self.response.clone()
    }
}

/// # Summary
/// 生成 `count` 根按天递增的 K 线，收盘价从 100 起每根加 1。
pub fn sample_candles(count: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).single().unwrap_or_default();
    (0..count)
        .map(|i| {
            let step = u32::try_from(i).unwrap_or(u32::MAX);
            let base = 100.0 + f64::from(step);
            Candle {
                time: start + chrono::Duration::days(i64::from(step)),
                open: base - 0.5,
                high: base + 1.0,
                low: base - 1.0,
                close: base,
                volume: 1_000 + u64::from(step),
            }
        })
        .collect()
}
