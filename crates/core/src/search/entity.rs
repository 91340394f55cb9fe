use serde::{Deserialize, Serialize};

/// # Summary
/// 参考证券表中的一条记录。
///
/// # Invariants
/// - `symbol` 在比较时不区分大小写。
/// - `keywords` 在加载时统一转为小写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    // 证券代码
    pub symbol: String,
    // 展示名称
    pub name: String,
    // 检索关键字
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl StockEntry {
    pub fn new(symbol: &str, name: &str, keywords: &[&str]) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// # Summary
/// 证券搜索策略。
///
/// # Invariants
/// - `Table` 基于内存参考表打分排序；`Remote` 直接采用上游全文检索排序。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    #[default]
    Table,
    Remote,
}

impl std::str::FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(SearchStrategy::Table),
            "remote" => Ok(SearchStrategy::Remote),
            _ => Err(format!("Unknown SearchStrategy: {}", s)),
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Table => write!(f, "table"),
            SearchStrategy::Remote => write!(f, "remote"),
        }
    }
}
