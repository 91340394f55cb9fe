use std::path::PathBuf;

use clap::Parser;

/// 命令行参数，位置参数与旧版启动方式保持一致：`quotegate [port] [static-dir]`
#[derive(Parser, Debug, Default)]
#[command(
    name = "quotegate",
    author,
    version,
    about = "Local market-data gateway with CORS and static file serving"
)]
pub struct Cli {
    /// Port to listen on (overrides config and environment)
    pub port: Option<u16>,

    /// Directory of the static web bundle (overrides config and environment)
    pub static_dir: Option<String>,

    /// Path to a config file (quotegate.toml / .yaml / .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
