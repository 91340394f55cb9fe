//! # `quotegate-api` - HTTP 网关
//!
//! 本 crate 是 QuoteGate 本地行情网关的 HTTP 服务入口。
//!
//! ## 架构职责
//! - 为每个响应注入 CORS 与禁止缓存响应头，并直接应答 `OPTIONS` 预检
//! - 将 `/api/` 前缀下的请求按有序前缀表分发到行情、检索与透传处理器
//! - 其余路径交给静态文件目录
//! - 将下层错误统一转换为 `{ "error": ... }` 信封

pub mod error;
pub mod gateway;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod server;
pub mod types;
