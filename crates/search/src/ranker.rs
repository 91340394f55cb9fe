//! # 证券检索打分
//!
//! 对参考表执行"精确匹配 + 阶梯匹配"两轮扫描：
//!
//! | 档位            | 条件                   | 分数    |
//! |-----------------|------------------------|---------|
//! | Exact           | 代码与查询完全相同     | 100000  |
//! | SymbolPrefix    | 代码以查询开头         | 80000   |
//! | NamePrefix      | 名称以查询开头         | 70000   |
//! | NameContains    | 名称包含查询           | 60000   |
//! | KeywordPrefix   | 任一关键字以查询开头   | 55000   |
//! | KeywordContains | 任一关键字包含查询     | 50000   |
//! | Lookup          | 上游按代码兜底查询     | 40000   |

use std::collections::HashSet;

use quotegate_core::market::entity::{QuoteSummary, SearchHit};
use quotegate_core::search::entity::StockEntry;
use serde::Serialize;

use crate::table::ReferenceTable;

/// 参考表条目的交易所展示值
pub const TABLE_EXCHANGE: &str = "NASDAQ/NYSE";
/// 参考表条目的品种类型
pub const TABLE_QUOTE_TYPE: &str = "EQUITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    SymbolPrefix,
    NamePrefix,
    NameContains,
    KeywordPrefix,
    KeywordContains,
    Lookup,
}

impl MatchTier {
    pub fn score(self) -> u32 {
        match self {
            MatchTier::Exact => 100_000,
            MatchTier::SymbolPrefix => 80_000,
            MatchTier::NamePrefix => 70_000,
            MatchTier::NameContains => 60_000,
            MatchTier::KeywordPrefix => 55_000,
            MatchTier::KeywordContains => 50_000,
            MatchTier::Lookup => 40_000,
        }
    }
}

/// # Summary
/// 检索分数：本地档位输出为整数，上游相关度保持浮点原值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    Tier(u32),
    Relevance(f64),
}

impl Score {
    /// 排序用的统一数值
    pub fn value(self) -> f64 {
        match self {
            Score::Tier(score) => f64::from(score),
            Score::Relevance(score) => score,
        }
    }
}

impl From<MatchTier> for Score {
    fn from(tier: MatchTier) -> Self {
        Score::Tier(tier.score())
    }
}

/// # Summary
/// 检索结果条目，字段名即对外 JSON 字段。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub shortname: String,
    pub longname: String,
    pub exchange: String,
    #[serde(rename = "quoteType")]
    pub quote_type: String,
    pub score: Score,
}

impl RankedSymbol {
    fn from_entry(entry: &StockEntry, tier: MatchTier) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            shortname: entry.name.clone(),
            longname: entry.name.clone(),
            exchange: TABLE_EXCHANGE.to_string(),
            quote_type: TABLE_QUOTE_TYPE.to_string(),
            score: tier.into(),
        }
    }

    /// 上游全文检索命中，保留上游分数
    pub fn from_hit(hit: SearchHit) -> Self {
        let shortname = hit
            .shortname
            .clone()
            .or_else(|| hit.longname.clone())
            .unwrap_or_else(|| hit.symbol.clone());
        let longname = hit.longname.unwrap_or_else(|| shortname.clone());
        Self {
            symbol: hit.symbol,
            shortname,
            longname,
            exchange: hit.exchange.unwrap_or_default(),
            quote_type: hit.quote_type.unwrap_or_else(|| TABLE_QUOTE_TYPE.to_string()),
            score: Score::Relevance(hit.score.unwrap_or_default()),
        }
    }

    /// 按代码兜底查询得到的合成条目；上游未返回代码视为查无此证券
    pub fn from_lookup(query_upper: &str, summary: QuoteSummary) -> Option<Self> {
        let symbol = summary.symbol?;
        Some(Self {
            symbol,
            shortname: summary.short_name.unwrap_or_else(|| query_upper.to_string()),
            longname: summary.long_name.unwrap_or_else(|| query_upper.to_string()),
            exchange: summary.exchange.unwrap_or_default(),
            quote_type: summary
                .quote_type
                .unwrap_or_else(|| TABLE_QUOTE_TYPE.to_string()),
            score: MatchTier::Lookup.into(),
        })
    }
}

/// # Summary
/// 阶梯匹配：返回条目命中的第一个档位。
///
/// # Arguments
/// * `entry`: 参考表条目（关键字已是小写）。
/// * `query_upper`: 大写查询串，用于比较代码。
/// * `query_lower`: 小写查询串，用于比较名称与关键字。
pub fn classify(entry: &StockEntry, query_upper: &str, query_lower: &str) -> Option<MatchTier> {
    let name = entry.name.to_lowercase();
    if entry.symbol.to_uppercase().starts_with(query_upper) {
        Some(MatchTier::SymbolPrefix)
    } else if name.starts_with(query_lower) {
        Some(MatchTier::NamePrefix)
    } else if name.contains(query_lower) {
        Some(MatchTier::NameContains)
    } else if entry.keywords.iter().any(|k| k.starts_with(query_lower)) {
        Some(MatchTier::KeywordPrefix)
    } else if entry.keywords.iter().any(|k| k.contains(query_lower)) {
        Some(MatchTier::KeywordContains)
    } else {
        None
    }
}

/// # Summary
/// 对参考表打分，结果按发现顺序排列（未排序、未截断）。
///
/// # Logic
/// 1. 首个代码精确相同的条目以 Exact 档位加入，后续重复代码不再参与精确匹配。
/// 2. 扫描剩余条目，跳过已加入的代码，按阶梯取第一个命中档位。
///
/// # Arguments
/// * `table`: 参考表。
/// * `query`: 非空查询串。
///
/// # Returns
/// 命中条目列表，每个代码最多出现一次。
pub fn rank_table(table: &ReferenceTable, query: &str) -> Vec<RankedSymbol> {
    let query_upper = query.to_uppercase();
    let query_lower = query.to_lowercase();
    let mut added: HashSet<String> = HashSet::new();
    let mut matches = Vec::new();

    if let Some(entry) = table
        .entries()
        .iter()
        .find(|e| e.symbol.to_uppercase() == query_upper)
    {
        added.insert(entry.symbol.to_uppercase());
        matches.push(RankedSymbol::from_entry(entry, MatchTier::Exact));
    }

    for entry in table.entries() {
        let key = entry.symbol.to_uppercase();
        if added.contains(&key) {
            continue;
        }
        if let Some(tier) = classify(entry, &query_upper, &query_lower) {
            added.insert(key);
            matches.push(RankedSymbol::from_entry(entry, tier));
        }
    }

    matches
}

/// 按分数降序稳定排序并截断
pub fn finalize(mut matches: Vec<RankedSymbol>, limit: usize) -> Vec<RankedSymbol> {
    matches.sort_by(|a, b| b.score.value().total_cmp(&a.score.value()));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str, name: &str, keywords: &[&str]) -> StockEntry {
        StockEntry::new(symbol, name, keywords)
    }

    #[test]
    fn test_ladder_prefers_first_rule() {
        let apple = entry("AAPL", "Apple Inc.", &["iphone", "mac"]);
        assert_eq!(classify(&apple, "AA", "aa"), Some(MatchTier::SymbolPrefix));
        assert_eq!(classify(&apple, "APP", "app"), Some(MatchTier::NamePrefix));
        assert_eq!(classify(&apple, "INC", "inc"), Some(MatchTier::NameContains));
        assert_eq!(classify(&apple, "IPH", "iph"), Some(MatchTier::KeywordPrefix));
        assert_eq!(classify(&apple, "HON", "hon"), Some(MatchTier::KeywordContains));
        assert_eq!(classify(&apple, "ZZZ", "zzz"), None);
    }

    #[test]
    fn test_keyword_prefix_outranks_contains_across_keywords() {
        // 第一个关键字仅"包含"，第二个关键字"以...开头"
        let e = entry("XYZ", "Something Corp", &["bigdata", "data center"]);
        assert_eq!(classify(&e, "DATA", "data"), Some(MatchTier::KeywordPrefix));
    }

    #[test]
    fn test_exact_match_kept_once_for_duplicates() {
        let table = ReferenceTable::from_entries(vec![
            entry("ASML", "ASML Holding", &["chip"]),
            entry("ASML", "ASML Holding NV", &["chip"]),
        ]);
        let matches = rank_table(&table, "asml");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].longname, "ASML Holding");
        assert_eq!(matches[0].score, Score::Tier(100_000));
    }

    #[test]
    fn test_finalize_is_stable_and_truncates() {
        let table = ReferenceTable::from_entries(vec![
            entry("AAA", "First", &["widget"]),
            entry("BBB", "Second", &["widget"]),
            entry("WID", "Third", &[]),
        ]);
        let ranked = finalize(rank_table(&table, "widget"), 15);
        let symbols: Vec<_> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB"]);

        let ranked = finalize(rank_table(&table, "wid"), 2);
        let symbols: Vec<_> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["WID", "AAA"]);
    }

    #[test]
    fn test_lookup_requires_symbol() {
        assert!(RankedSymbol::from_lookup("ZZZZ", QuoteSummary::default()).is_none());

        let summary = QuoteSummary {
            symbol: Some("ZZZZ".into()),
            exchange: Some("NYQ".into()),
            ..QuoteSummary::default()
        };
        let hit = RankedSymbol::from_lookup("ZZZZ", summary).unwrap();
        assert_eq!(hit.shortname, "ZZZZ");
        assert_eq!(hit.quote_type, "EQUITY");
        assert_eq!(hit.score, Score::Tier(40_000));
    }

    #[test]
    fn test_tier_scores_serialize_as_integers() {
        let apple = entry("AAPL", "Apple Inc.", &[]);
        let json = serde_json::to_value(RankedSymbol::from_entry(&apple, MatchTier::Exact)).unwrap();
        assert!(json["score"].is_u64());
        assert_eq!(json["score"].to_string(), "100000");

        let hit = SearchHit {
            symbol: "AAPL".into(),
            score: Some(2_137.5),
            ..SearchHit::default()
        };
        let json = serde_json::to_value(RankedSymbol::from_hit(hit)).unwrap();
        assert_eq!(json["score"].as_f64(), Some(2_137.5));
    }
}
