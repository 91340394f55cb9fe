//! # API 服务启动器
//!
//! 组装 axum 路由、挂载响应头中间件与请求追踪层并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use quotegate_core::relay::port::JsonRelay;
use quotegate_market::service::MarketService;
use quotegate_search::service::SymbolSearch;

use crate::gateway;
use crate::middleware::headers::response_headers;

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到网关处理器中。
///
/// # Invariants
/// - 所有字段在服务启动前由 DI 容器注入，生命周期与进程等同，均为只读。
#[derive(Clone)]
pub struct AppState {
    /// 行情归一化服务
    pub market: Arc<MarketService>,
    /// 证券检索服务
    pub search: Arc<SymbolSearch>,
    /// CoinGecko 透传
    pub relay: Arc<dyn JsonRelay>,
    /// 静态文件服务
    pub static_files: ServeDir,
}

impl AppState {
    pub fn new(
        market: Arc<MarketService>,
        search: Arc<SymbolSearch>,
        relay: Arc<dyn JsonRelay>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            market,
            search,
            relay,
            static_files: ServeDir::new(static_dir.into()),
        }
    }
}

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用
///
/// 所有请求都进入 `gateway::dispatch`；响应头中间件包裹整个网关，
/// 因而 404/405/500 与静态文件响应同样带有 CORS 与禁止缓存响应头。
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(gateway::dispatch)
        .with_state(state)
        .layer(axum::middleware::from_fn(response_headers))
        .layer(TraceLayer::new_for_http())
}

/// # Summary
/// 在已绑定的监听器上启动 HTTP 服务，直到 `shutdown` 完成。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `listener` - 已绑定的 TCP 监听器
/// * `shutdown` - 优雅停机信号
///
/// # Returns
/// 服务正常退出返回 Ok，IO 错误向上传递。
pub async fn serve(
    state: AppState,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// 绑定地址并启动服务，如 `"0.0.0.0:8080"`
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("QuoteGate listening on {}", bind_addr);
    serve(state, listener, shutdown).await
}
