//! # Yahoo 会话凭证
//!
//! Yahoo 的 quote 接口要求请求同时携带会话 Cookie 与 crumb。
//! Cookie 由客户端的 cookie store 自动保存，crumb 则缓存在此处。

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use tokio::sync::Mutex;

use quotegate_core::market::error::MarketError;

use crate::transport_error;

/// # Summary
/// 惰性获取并缓存 crumb 的会话。
///
/// # Invariants
/// - 同一时刻最多只有一个任务在刷新 crumb（由异步互斥锁保证）。
/// - crumb 失效后只清空缓存，由下一次请求重新获取，不在当前请求内重试。
/// - 排队等待期间若已有一次刷新完成且失败，等待者直接共享该错误，不再发起新的刷新。
#[derive(Default)]
pub struct CrumbSession {
    state: Mutex<CrumbState>,
    // 已完成的刷新次数，在持锁状态下递增
    refreshes: AtomicU64,
}

#[derive(Default)]
struct CrumbState {
    crumb: Option<String>,
    last_error: Option<MarketError>,
}

impl CrumbSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 返回当前 crumb，必要时先向上游申请。
    ///
    /// # Logic
    /// 1. 命中缓存直接返回。
    /// 2. 等锁期间其他任务已完成一次失败的刷新时，直接返回该错误。
    /// 3. 访问 Cookie 主机，仅为获得 Set-Cookie，状态码不作判断。
    /// 4. 调用 `v1/test/getcrumb` 取得 crumb 并校验格式。
    ///
    /// # Arguments
    /// * `client`: 已开启 cookie store 的 HTTP 客户端。
    /// * `cookie_url`: 下发会话 Cookie 的地址。
    /// * `query_url`: Yahoo 查询主机。
    ///
    /// # Returns
    /// 成功返回 crumb 字符串。
    pub async fn crumb(
        &self,
        client: &Client,
        cookie_url: &str,
        query_url: &str,
    ) -> Result<String, MarketError> {
        let seen = self.refreshes.load(Ordering::Acquire);
        let mut state = self.state.lock().await;
        if let Some(crumb) = state.crumb.as_ref() {
            return Ok(crumb.clone());
        }
        if self.refreshes.load(Ordering::Acquire) != seen {
            if let Some(err) = state.last_error.as_ref() {
                return Err(err.clone());
            }
        }

        let outcome = fetch_crumb(client, cookie_url, query_url).await;
        match &outcome {
            Ok(crumb) => {
                tracing::debug!("Yahoo crumb refreshed");
                state.crumb = Some(crumb.clone());
                state.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Yahoo crumb refresh failed: {}", e);
                state.last_error = Some(e.clone());
            }
        }
        self.refreshes.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// 丢弃缓存的 crumb
    pub async fn invalidate(&self) {
        self.state.lock().await.crumb = None;
    }

    /// 当前是否持有 crumb
    pub async fn is_cached(&self) -> bool {
        self.state.lock().await.crumb.is_some()
    }
}

async fn fetch_crumb(
    client: &Client,
    cookie_url: &str,
    query_url: &str,
) -> Result<String, MarketError> {
    client
        .get(cookie_url)
        .send()
        .await
        .map_err(transport_error)?;

    let resp = client
        .get(format!("{}/v1/test/getcrumb", query_url))
        .send()
        .await
        .map_err(transport_error)?;

    if !resp.status().is_success() {
        return Err(MarketError::Network(format!(
            "crumb request failed: HTTP {}",
            resp.status()
        )));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| MarketError::Parse(e.to_string()))?;
    let crumb = body.trim();
    if !is_valid_crumb(crumb) {
        return Err(MarketError::Parse(format!(
            "unexpected crumb payload: {:.40}",
            crumb
        )));
    }
    Ok(crumb.to_string())
}

// 限流或被拦截时上游会返回 HTML 页面而不是 crumb
fn is_valid_crumb(raw: &str) -> bool {
    !raw.is_empty() && raw.len() <= 64 && !raw.contains(char::is_whitespace) && !raw.contains('<')
}
