//! # Yahoo 风格行情接口
//!
//! 处理器只负责取参与序列化，归一化逻辑在 `quotegate-market` 与 `quotegate-search` 中。

use axum::Json;
use quotegate_market::envelope::{
    ChartEnvelope, MarketSummaryEnvelope, QuoteEnvelope, TrendingEnvelope,
};
use quotegate_search::service::SearchEnvelope;

use crate::error::ApiError;
use crate::router::QueryParams;
use crate::server::AppState;

fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

/// # Summary
/// `GET /api/yahoo/chart/{symbol}?range=&interval=`
///
/// # Returns
/// 图表信封；无数据时为带 `error.description` 的空信封，上游失败返回 500。
pub async fn chart(
    state: &AppState,
    symbol: &str,
    params: &QueryParams,
) -> Result<Json<ChartEnvelope>, ApiError> {
    let envelope = state
        .market
        .chart(symbol, param(params, "range"), param(params, "interval"))
        .await?;
    Ok(Json(envelope))
}

/// `GET /api/yahoo/quote?symbols=a,b,c`，单个代码失败不影响整批
pub async fn quote(state: &AppState, params: &QueryParams) -> Json<QuoteEnvelope> {
    let symbols = param(params, "symbols").unwrap_or_default();
    Json(state.market.quotes(symbols).await)
}

/// `GET /api/yahoo/search?q=`
pub async fn search(state: &AppState, params: &QueryParams) -> Json<SearchEnvelope> {
    let query = param(params, "q").unwrap_or_default();
    Json(state.search.search(query).await)
}

pub async fn market_summary(state: &AppState) -> Json<MarketSummaryEnvelope> {
    Json(state.market.market_summary().await)
}

pub fn trending(state: &AppState) -> Json<TrendingEnvelope> {
    Json(state.market.trending())
}
