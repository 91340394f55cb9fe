use async_trait::async_trait;
use quotegate_core::config::UpstreamConfig;
use quotegate_core::market::error::MarketError;
use quotegate_core::relay::port::JsonRelay;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

use crate::{ensure_crypto_provider, transport_error};

/// # Summary
/// CoinGecko 接口透传实现。
///
/// # Invariants
/// - 固定使用通用浏览器 User-Agent 与 `Accept: application/json`。
/// - 关闭证书与主机名校验，仅用于本地开发代理场景。
#[derive(Clone)]
pub struct CoinGeckoRelay {
    client: Client,
    base_url: String,
}

impl CoinGeckoRelay {
    /// # Summary
    /// 创建透传客户端。
    ///
    /// # Logic
    /// 1. 超时取 `relay_timeout_secs`（默认 30 秒）。
    /// 2. `danger_accept_invalid_certs` 在 rustls 下同时跳过主机名校验。
    pub fn new(config: &UpstreamConfig) -> Result<Self, MarketError> {
        ensure_crypto_provider();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.relay_timeout_secs))
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| MarketError::Unknown(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.coingecko_url.trim_end_matches('/').to_string(),
        })
    }

    /// 拼接最终上游地址，路径与查询串保持原样
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

#[async_trait]
impl JsonRelay for CoinGeckoRelay {
    async fn forward(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<serde_json::Value, MarketError> {
        let url = self.target_url(path, query);
        tracing::debug!("Relaying to {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!(
                "HTTP {} from {}",
                resp.status(),
                url
            )));
        }

        let body = resp.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body).map_err(|e| MarketError::Parse(e.to_string()))
    }
}
