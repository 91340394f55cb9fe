use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quotegate_core::common::{ChartRange, Interval};
use quotegate_core::config::UpstreamConfig;
use quotegate_core::market::entity::{Candle, FastQuote, QuoteSummary, SearchHit};
use quotegate_core::market::error::MarketError;
use quotegate_core::market::port::MarketDataProvider;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::session::CrumbSession;
use crate::{ensure_crypto_provider, transport_error};

// 全文检索时向上游索取的候选数量，最终截断由搜索层负责
const SEARCH_QUOTES_COUNT: &str = "20";
const NEWS_COUNT: &str = "10";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，开启 cookie store 以维持会话。
/// - 克隆后共享同一个 crumb 会话。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    query_url: String,
    search_url: String,
    cookie_url: String,
    session: Arc<CrumbSession>,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 按配置设置请求超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化带 cookie store 的 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 上游地址与超时配置。
    ///
    /// # Returns
    /// 返回初始化后的 YahooProvider，客户端构建失败时返回 MarketError。
    pub fn new(config: &UpstreamConfig) -> Result<Self, MarketError> {
        ensure_crypto_provider();

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| MarketError::Unknown(format!("invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| MarketError::Unknown(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            query_url: config.yahoo_query_url.trim_end_matches('/').to_string(),
            search_url: config.yahoo_search_url.trim_end_matches('/').to_string(),
            cookie_url: config.yahoo_cookie_url.clone(),
            session: Arc::new(CrumbSession::new()),
        })
    }

    /// 请求 v8 chart 接口并取出唯一的时间序列结果
    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<YahooResult, MarketError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.query_url,
            urlencoding::encode(symbol)
        );

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range),
                ("interval", interval),
                ("includePrePost", "false"),
                ("events", "div,splits"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(MarketError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        if let Some(err) = json.chart.error {
            return Err(match err.code.as_deref() {
                Some("Not Found") => MarketError::NotFound,
                _ => MarketError::Unknown(err.description),
            });
        }

        json.chart
            .result
            .and_then(|mut results| results.pop())
            .ok_or(MarketError::NotFound)
    }

    /// 请求 v1 search 接口，新闻与候选标的共用此入口
    async fn fetch_search(
        &self,
        query: &str,
        quotes_count: &str,
        news_count: &str,
    ) -> Result<YahooSearchResponse, MarketError> {
        let resp = self
            .client
            .get(format!("{}/v1/finance/search", self.search_url))
            .query(&[
                ("q", query),
                ("quotesCount", quotes_count),
                ("newsCount", news_count),
                ("enableFuzzyQuery", "false"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// # Invariants
/// - 无数据时上游会省略 `timestamp` 与各指标数组。
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// 图表元数据，即轻量报价视图的来源。
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct YahooMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<u64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据。
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct YahooQuote {
    /// 开盘价列表
    open: Vec<Option<f64>>,
    /// 最高价列表
    high: Vec<Option<f64>>,
    /// 最低价列表
    low: Vec<Option<f64>>,
    /// 收盘价列表
    close: Vec<Option<f64>>,
    /// 成交量列表
    volume: Vec<Option<u64>>,
}

/// Yahoo v7 quote 接口响应
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteResponse {
    quote_response: YahooQuoteBody,
}

#[derive(Deserialize, Debug)]
struct YahooQuoteBody {
    #[serde(default)]
    result: Vec<QuoteSummary>,
}

/// Yahoo v1 search 接口响应
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct YahooSearchResponse {
    quotes: Vec<SearchHit>,
    news: Vec<serde_json::Value>,
}

/// # Summary
/// 将时间序列结果展开为 K 线列表。
///
/// # Logic
/// 1. 以 `timestamp` 为主轴逐行对齐 OHLCV。
/// 2. 任一字段为空（停牌、盘前占位等）的行整行丢弃，保证输出各序列等长。
fn candles_from_result(result: &YahooResult) -> Vec<Candle> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let time = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(Candle {
                time,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
                volume: quote.volume.get(i).copied().flatten()?,
            })
        })
        .collect()
}

/// # Summary
/// 由图表元数据与最近几根日线推导轻量报价视图。
///
/// # Logic
/// 1. 最新价优先取元数据，缺失时取最后一根收盘价。
/// 2. 前收盘价取倒数第二根日线收盘价，不足两根时退回元数据。
/// 3. 当日高低价与成交量优先取元数据，开盘价取最后一根日线。
/// 4. 图表接口不提供市值，保持为空。
fn fast_quote_from_result(result: &YahooResult) -> FastQuote {
    let candles = candles_from_result(result);
    let last = candles.last();
    let previous = candles.len().checked_sub(2).and_then(|i| candles.get(i));
    let meta = &result.meta;

    FastQuote {
        last_price: meta.regular_market_price.or(last.map(|c| c.close)),
        previous_close: previous
            .map(|c| c.close)
            .or(meta.previous_close)
            .or(meta.chart_previous_close),
        open: last.map(|c| c.open),
        day_high: meta.regular_market_day_high.or(last.map(|c| c.high)),
        day_low: meta.regular_market_day_low.or(last.map(|c| c.low)),
        last_volume: meta.regular_market_volume.or(last.map(|c| c.volume)),
        market_cap: None,
        year_high: meta.fifty_two_week_high,
        year_low: meta.fifty_two_week_low,
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取 K 线历史数据。
    ///
    /// # Logic
    /// 1. 以 `range` / `interval` 调用 v8 chart 接口。
    /// 2. 解析嵌套 JSON 并逐行对齐为 K 线。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `range`: 回溯区间。
    /// * `interval`: 采样间隔。
    ///
    /// # Returns
    /// 成功返回 K 线列表（可能为空），上游 404 返回 `MarketError::NotFound`。
    async fn fetch_history(
        &self,
        symbol: &str,
        range: ChartRange,
        interval: Interval,
    ) -> Result<Vec<Candle>, MarketError> {
        let result = self
            .fetch_chart(symbol, range.as_str(), interval.as_str())
            .await?;
        Ok(candles_from_result(&result))
    }

    /// # Summary
    /// 调用 v7 quote 接口获取详细资料。
    ///
    /// # Logic
    /// 1. 从会话取得 crumb（首次调用会先建立会话）。
    /// 2. 401/403 表示 crumb 已失效：清空缓存并直接返回错误，不在本次请求内重试。
    /// 3. 结果数组为空视为证券不存在。
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketError> {
        let crumb = self
            .session
            .crumb(&self.client, &self.cookie_url, &self.query_url)
            .await?;

        let resp = self
            .client
            .get(format!("{}/v7/finance/quote", self.query_url))
            .query(&[("symbols", symbol), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Yahoo rejected crumb for {} ({}), dropping session", symbol, status);
            self.session.invalidate().await;
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }

        let json: YahooQuoteResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        json.quote_response
            .result
            .into_iter()
            .next()
            .ok_or(MarketError::NotFound)
    }

    /// # Summary
    /// 以 5 日日线图表推导轻量报价。
    async fn fetch_fast_quote(&self, symbol: &str) -> Result<FastQuote, MarketError> {
        let result = self.fetch_chart(symbol, "5d", "1d").await?;
        Ok(fast_quote_from_result(&result))
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<serde_json::Value>, MarketError> {
        let resp = self.fetch_search(symbol, "0", NEWS_COUNT).await?;
        Ok(resp.news)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchHit>, MarketError> {
        let resp = self.fetch_search(query, SEARCH_QUOTES_COUNT, "0").await?;
        Ok(resp.quotes)
    }
}
