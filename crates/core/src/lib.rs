//! # `quotegate-core` - 领域核心
//!
//! 定义网关各层共享的端口 (trait)、实体、错误与配置。
//! 本 crate 不包含任何网络实现，具体数据源由 `quotegate-feed` 提供。

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod relay {
    pub mod port;
}

pub mod search {
    pub mod entity;
}

#[cfg(feature = "test-utils")]
pub mod test_utils;
