use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use quotegate_api::server::{AppState, start_server};
use quotegate_feed::coingecko::CoinGeckoRelay;
use quotegate_feed::yahoo::YahooProvider;
use quotegate_market::service::MarketService;
use quotegate_search::service::SymbolSearch;
use quotegate_search::table::ReferenceTable;
use tracing::{info, warn};

mod cli;
mod logging;
mod settings;

use cli::Cli;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到各服务。
///
/// # Logic
/// 1. 解析命令行并合成配置，初始化全局日志。
/// 2. 实例化基础设施层（Yahoo 数据源、CoinGecko 透传）。
/// 3. 加载参考表并构造应用服务层（MarketService、SymbolSearch）。
/// 4. 启动 HTTP 服务，收到 Ctrl-C 后优雅停机。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 配置与日志
    let cli = Cli::parse();
    let config = settings::load(&cli)?;
    let _log_guard = logging::init(&config.log)?;
    info!("QuoteGate starting...");

    // 2. 实例化基础设施层
    quotegate_feed::ensure_crypto_provider();
    let yahoo = Arc::new(YahooProvider::new(&config.upstream)?);
    let relay = Arc::new(CoinGeckoRelay::new(&config.upstream)?);

    // 3. 参考表只在启动时加载一次
    let table = match &config.search.table_path {
        Some(path) => ReferenceTable::load(Path::new(path))?,
        None => ReferenceTable::builtin(),
    };
    info!("Reference table loaded: {} entries", table.len());

    let market = MarketService::new(yahoo.clone());
    let search = SymbolSearch::new(Arc::new(table), yahoo, &config.search);

    // 4. 启动服务
    let static_dir = resolve_static_dir(&config.server.static_dir);
    info!("Server running on http://localhost:{}", config.server.port);
    info!("Serving static files from {}", static_dir.display());
    info!("Search strategy: {}", search.strategy());

    let state = AppState::new(market, search, relay, static_dir);
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(state, &bind_addr, shutdown_signal()).await?;

    info!("Server stopped.");
    Ok(())
}

/// 静态目录不存在时回退到当前工作目录
fn resolve_static_dir(dir: &str) -> PathBuf {
    let path = PathBuf::from(dir);
    if path.is_dir() {
        path
    } else {
        warn!(
            "Static directory '{}' not found, serving current directory",
            dir
        );
        PathBuf::from(".")
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Stopping..."),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
