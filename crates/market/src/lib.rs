//! # `quotegate-market` - 行情归一化
//!
//! 调用上游数据源，并将结果重塑为前端约定的固定 JSON 信封：
//! 历史图表、批量报价、指数概览与热门代码。

pub mod chart;
pub mod envelope;
pub mod quote;
pub mod service;
pub mod summary;
