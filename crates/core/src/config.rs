use crate::search::entity::SearchStrategy;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    // 静态资源目录，不存在时回退到当前工作目录
    pub static_dir: String,
}

/// 上游数据源地址与超时
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub yahoo_query_url: String,
    pub yahoo_search_url: String,
    // 获取会话 Cookie 的主机，配合 crumb 使用
    pub yahoo_cookie_url: String,
    pub coingecko_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub relay_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    // 可选的 JSON 参考表，替换内置表
    pub table_path: Option<String>,
    pub max_results: usize,
    pub max_news: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // 设置后额外写入按天滚动的日志文件
    pub dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "build/web".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            yahoo_query_url: "https://query1.finance.yahoo.com".to_string(),
            yahoo_search_url: "https://query2.finance.yahoo.com".to_string(),
            yahoo_cookie_url: "https://fc.yahoo.com".to_string(),
            coingecko_url: "https://api.coingecko.com/api/v3".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 10,
            relay_timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Table,
            table_path: None,
            max_results: 15,
            max_news: 10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
