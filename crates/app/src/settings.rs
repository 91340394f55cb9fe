//! # 配置加载
//!
//! 优先级由低到高：内置默认值 → 配置文件 → `QUOTEGATE__SECTION__KEY` 环境变量 → 命令行位置参数。

use config::{Config, ConfigError, Environment, File};
use quotegate_core::config::AppConfig;

use crate::cli::Cli;

/// 默认配置文件名（不含扩展名），在工作目录下查找
const DEFAULT_CONFIG_NAME: &str = "quotegate";
const ENV_PREFIX: &str = "QUOTEGATE";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// # Summary
/// 按层叠顺序合成最终配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. `--config` 指定的文件必须存在；未指定时工作目录下的 `quotegate.*` 可选。
/// 3. 叠加环境变量，再叠加命令行端口与静态目录。
///
/// # Arguments
/// * `cli`: 已解析的命令行参数。
/// * `env`: 环境变量来源。
///
/// # Returns
/// 成功返回配置，文件缺失或字段类型错误返回 ConfigError。
fn load_with(cli: &Cli, env: Environment) -> Result<AppConfig, ConfigError> {
    let file = match &cli.config {
        Some(path) => File::from(path.as_path()).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let mut builder = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(file)
        .add_source(env);

    if let Some(port) = cli.port {
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Some(dir) = &cli.static_dir {
        builder = builder.set_override("server.static_dir", dir.as_str())?;
    }

    builder.build()?.try_deserialize()
}

pub fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    load_with(cli, environment())
}
