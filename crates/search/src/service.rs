use std::sync::Arc;

use quotegate_core::config::SearchConfig;
use quotegate_core::market::port::MarketDataProvider;
use quotegate_core::search::entity::SearchStrategy;
use serde::Serialize;
use tracing::{debug, info};

use crate::news::{NewsItem, extract_news};
use crate::ranker::{RankedSymbol, finalize, rank_table};
use crate::table::ReferenceTable;

/// 远程检索保留的品种类型
pub const REMOTE_QUOTE_TYPES: &[&str] = &["EQUITY", "ETF", "INDEX", "MUTUALFUND", "CRYPTOCURRENCY"];

/// 检索响应 `{ quotes, news }`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchEnvelope {
    pub quotes: Vec<RankedSymbol>,
    pub news: Vec<NewsItem>,
}

/// # Summary
/// 证券检索服务。
///
/// # Invariants
/// - 参考表在构造时注入且只读。
/// - 检索永不失败：任何上游错误都退化为空结果。
pub struct SymbolSearch {
    table: Arc<ReferenceTable>,
    provider: Arc<dyn MarketDataProvider>,
    strategy: SearchStrategy,
    max_results: usize,
    max_news: usize,
}

impl SymbolSearch {
    pub fn new(
        table: Arc<ReferenceTable>,
        provider: Arc<dyn MarketDataProvider>,
        config: &SearchConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            table,
            provider,
            strategy: config.strategy,
            max_results: config.max_results,
            max_news: config.max_news,
        })
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// # Summary
    /// 执行一次检索。
    ///
    /// # Logic
    /// 1. 空查询（去除空白后）直接返回空结果，不访问上游。
    /// 2. 按策略取得候选：参考表打分，或上游全文检索并按品种过滤。
    /// 3. 候选为空时按大写代码向上游兜底查询一次。
    /// 4. 参考表结果按分数稳定排序；远程结果保持上游顺序；统一截断。
    /// 5. 尽力获取首条结果的相关新闻，失败时新闻为空。
    ///
    /// # Arguments
    /// * `query`: 原始查询串。
    ///
    /// # Returns
    /// 检索信封。
    pub async fn search(&self, query: &str) -> SearchEnvelope {
        let query = query.trim();
        if query.is_empty() {
            return SearchEnvelope::default();
        }

        let mut quotes = match self.strategy {
            SearchStrategy::Table => rank_table(&self.table, query),
            SearchStrategy::Remote => self.remote_matches(query).await,
        };

        if quotes.is_empty()
            && let Some(hit) = self.lookup(query).await
        {
            quotes.push(hit);
        }

        let quotes = match self.strategy {
            SearchStrategy::Table => finalize(quotes, self.max_results),
            SearchStrategy::Remote => {
                quotes.truncate(self.max_results);
                quotes
            }
        };

        let news = match quotes.first() {
            Some(top) => self.related_news(&top.symbol).await,
            None => Vec::new(),
        };

        info!(
            "Search '{}' ({}): {} quotes, {} news",
            query,
            self.strategy,
            quotes.len(),
            news.len()
        );
        SearchEnvelope { quotes, news }
    }

    async fn remote_matches(&self, query: &str) -> Vec<RankedSymbol> {
        match self.provider.search_symbols(query).await {
            Ok(hits) => hits
                .into_iter()
                .filter(|hit| {
                    hit.quote_type
                        .as_deref()
                        .is_some_and(|t| REMOTE_QUOTE_TYPES.contains(&t))
                })
                .map(RankedSymbol::from_hit)
                .collect(),
            Err(e) => {
                debug!("Remote search for '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn lookup(&self, query: &str) -> Option<RankedSymbol> {
        let query_upper = query.to_uppercase();
        match self.provider.fetch_quote_summary(&query_upper).await {
            Ok(summary) => RankedSymbol::from_lookup(&query_upper, summary),
            Err(e) => {
                debug!("Symbol lookup for '{}' failed: {}", query_upper, e);
                None
            }
        }
    }

    async fn related_news(&self, symbol: &str) -> Vec<NewsItem> {
        match self.provider.fetch_news(symbol).await {
            Ok(articles) => articles
                .iter()
                .take(self.max_news)
                .map(extract_news)
                .collect(),
            Err(e) => {
                debug!("News lookup for {} failed: {}", symbol, e);
                Vec::new()
            }
        }
    }
}
