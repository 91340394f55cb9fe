//! # `quotegate-feed` - 上游数据源适配层
//!
//! - [`yahoo::YahooProvider`]：行情、报价、新闻、全文检索
//! - [`coingecko::CoinGeckoRelay`]：加密货币接口原样透传

pub mod coingecko;
pub mod session;
pub mod yahoo;

use quotegate_core::market::error::MarketError;

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Logic
/// 1. reqwest 以 `rustls-no-provider` 方式编译，构建客户端前必须存在默认后端。
/// 2. 重复安装会返回 Err，直接忽略即可，因此本函数可被多次调用。
pub fn ensure_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::trace!("rustls crypto provider already installed");
    }
}

/// 将 reqwest 传输层错误映射为领域错误
pub(crate) fn transport_error(err: reqwest::Error) -> MarketError {
    if err.is_timeout() {
        MarketError::Timeout(err.to_string())
    } else {
        MarketError::Network(err.to_string())
    }
}
