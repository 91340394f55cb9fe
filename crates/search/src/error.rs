use thiserror::Error;

/// # Summary
/// 参考表加载错误。
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to read reference table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reference table is empty: {0}")]
    EmptyTable(String),
}
