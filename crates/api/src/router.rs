//! # 请求路由
//!
//! `/api/` 前缀下的路径去除前缀后，按固定顺序做前缀匹配，首个命中者生效。
//! 路由解析与查询串解析都是纯函数，不依赖 axum。

use std::borrow::Cow;
use std::collections::HashMap;

/// API 保留前缀，其余路径一律视为静态资源
pub const API_PREFIX: &str = "/api/";

/// 查询参数表（同名参数后者覆盖前者）
pub type QueryParams = HashMap<String, String>;

/// 已识别的 API 接口
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    Chart { symbol: String },
    Quote,
    Search,
    MarketSummary,
    Trending,
    CoinGecko { path: String },
}

impl ApiRoute {
    /// # Summary
    /// 解析去除前缀后的 API 路径。
    ///
    /// # Logic
    /// 依次匹配 `yahoo/chart/`、`yahoo/quote`、`yahoo/search`、`yahoo/market-summary`、
    /// `yahoo/trending`、`coingecko/`；图表代码不能为空。
    ///
    /// # Arguments
    /// * `api_path`: 去除 `/api/` 后的路径。
    ///
    /// # Returns
    /// 命中返回路由，否则返回 None（由调用方应答 404）。
    pub fn resolve(api_path: &str) -> Option<Self> {
        if let Some(symbol) = api_path.strip_prefix("yahoo/chart/") {
            if symbol.is_empty() {
                return None;
            }
            return Some(ApiRoute::Chart {
                symbol: decode(symbol, false),
            });
        }
        if api_path.starts_with("yahoo/quote") {
            return Some(ApiRoute::Quote);
        }
        if api_path.starts_with("yahoo/search") {
            return Some(ApiRoute::Search);
        }
        if api_path.starts_with("yahoo/market-summary") {
            return Some(ApiRoute::MarketSummary);
        }
        if api_path.starts_with("yahoo/trending") {
            return Some(ApiRoute::Trending);
        }
        api_path
            .strip_prefix("coingecko/")
            .map(|path| ApiRoute::CoinGecko {
                path: path.to_string(),
            })
    }
}

/// 去除 API 前缀；非 API 路径返回 None
pub fn api_path(path: &str) -> Option<&str> {
    path.strip_prefix(API_PREFIX)
}

/// 百分号解码，无法解码时保留原文；查询串中的 `+` 视为空格
fn decode(raw: &str, plus_as_space: bool) -> String {
    let spaced: Cow<'_, str> = if plus_as_space && raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// # Summary
/// 解析原始查询串。
///
/// # Logic
/// 1. 以 `&` 切分，每段在第一个 `=` 处切分为键值；没有 `=` 的片段被忽略。
/// 2. 键与值均做百分号解码。
/// 3. 同名参数后出现者覆盖先出现者。
///
/// # Arguments
/// * `raw`: 原始查询串（不含 `?`）。
///
/// # Returns
/// 参数表。
pub fn parse_query(raw: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(raw) = raw else {
        return params;
    };
    for piece in raw.split('&') {
        if let Some((key, value)) = piece.split_once('=') {
            params.insert(decode(key, true), decode(value, true));
        }
    }
    params
}
