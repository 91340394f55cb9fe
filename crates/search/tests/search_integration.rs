use std::sync::Arc;

use quotegate_core::config::SearchConfig;
use quotegate_core::market::entity::SearchHit;
use quotegate_core::market::error::MarketError;
use quotegate_core::search::entity::{SearchStrategy, StockEntry};
use quotegate_core::test_utils::StubMarketProvider;
use quotegate_search::ranker::Score;
use quotegate_search::service::SymbolSearch;
use quotegate_search::table::ReferenceTable;
use serde_json::json;

fn table_search(provider: StubMarketProvider) -> (Arc<SymbolSearch>, Arc<StubMarketProvider>) {
    let provider = Arc::new(provider);
    let search = SymbolSearch::new(
        Arc::new(ReferenceTable::builtin()),
        provider.clone(),
        &SearchConfig::default(),
    );
    (search, provider)
}

fn hit(symbol: &str, quote_type: &str, score: f64) -> SearchHit {
    SearchHit {
        symbol: symbol.to_string(),
        shortname: Some(format!("{} short", symbol)),
        longname: None,
        exchange: Some("NMS".to_string()),
        quote_type: Some(quote_type.to_string()),
        score: Some(score),
    }
}

#[tokio::test]
async fn test_empty_query_makes_no_upstream_calls() {
    let (search, provider) = table_search(StubMarketProvider::new());

    let result = search.search("   ").await;

    assert!(result.quotes.is_empty());
    assert!(result.news.is_empty());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_exact_symbol_ranks_first() {
    let (search, _) = table_search(StubMarketProvider::new());

    let result = search.search("aapl").await;

    assert_eq!(result.quotes[0].symbol, "AAPL");
    assert_eq!(result.quotes[0].score, Score::Tier(100_000));
    assert_eq!(result.quotes[0].exchange, "NASDAQ/NYSE");
    assert_eq!(result.quotes[0].quote_type, "EQUITY");
    let exact = result.quotes.iter().filter(|q| q.score == Score::Tier(100_000)).count();
    assert_eq!(exact, 1);
}

#[tokio::test]
async fn test_results_sorted_and_truncated() {
    let (search, _) = table_search(StubMarketProvider::new());

    // "a" 命中大量条目
    let result = search.search("a").await;

    assert_eq!(result.quotes.len(), 15);
    assert!(
        result
            .quotes
            .windows(2)
            .all(|pair| pair[0].score.value() >= pair[1].score.value())
    );
    assert_eq!(result.quotes[0].symbol, "AAPL");
}

#[tokio::test]
async fn test_equal_scores_keep_table_order() -> anyhow::Result<()> {
    let table = ReferenceTable::from_entries(vec![
        StockEntry::new("ZZA", "Alpha Holdings", &["widget maker"]),
        StockEntry::new("ZZB", "Beta Holdings", &["widget seller"]),
    ]);
    let search = SymbolSearch::new(
        Arc::new(table),
        Arc::new(StubMarketProvider::new()),
        &SearchConfig::default(),
    );

    let result = search.search("widget").await;

    let symbols: Vec<_> = result.quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ZZA", "ZZB"]);
    assert!(result.quotes.iter().all(|q| q.score == Score::Tier(55_000)));
    Ok(())
}

#[tokio::test]
async fn test_lookup_fallback_when_table_misses() {
    let provider = StubMarketProvider::new().with_listed("QQQQX", "Obscure Fund", 12.0);
    let (search, _) = table_search(provider);

    let result = search.search("qqqqx").await;

    assert_eq!(result.quotes.len(), 1);
    assert_eq!(result.quotes[0].symbol, "QQQQX");
    assert_eq!(result.quotes[0].shortname, "Obscure Fund");
    assert_eq!(result.quotes[0].score, Score::Tier(40_000));
}

#[tokio::test]
async fn test_total_miss_yields_empty_envelope() {
    let (search, provider) = table_search(StubMarketProvider::new());

    let result = search.search("qwxzv").await;

    assert!(result.quotes.is_empty());
    assert!(result.news.is_empty());
    // 仅一次兜底查询，无新闻查询
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_news_for_top_result_is_capped() {
    let articles: Vec<_> = (0..12)
        .map(|i| json!({ "uuid": format!("n{}", i), "title": format!("Story {}", i) }))
        .collect();
    let provider = StubMarketProvider::new().with_news("MSFT", Ok(articles));
    let (search, _) = table_search(provider);

    let result = search.search("MSFT").await;

    assert_eq!(result.quotes[0].symbol, "MSFT");
    assert_eq!(result.news.len(), 10);
    assert_eq!(result.news[0].uuid, "n0");
}

#[tokio::test]
async fn test_news_failure_is_swallowed() {
    let provider = StubMarketProvider::new().with_news(
        "NVDA",
        Err(MarketError::Timeout("news".to_string())),
    );
    let (search, _) = table_search(provider);

    let result = search.search("nvda").await;

    assert_eq!(result.quotes[0].symbol, "NVDA");
    assert!(result.news.is_empty());
}

#[tokio::test]
async fn test_remote_strategy_filters_and_keeps_order() {
    let provider = StubMarketProvider::new().with_search(
        "bit",
        Ok(vec![
            hit("BTC-USD", "CRYPTOCURRENCY", 30_000.0),
            hit("BITF", "EQUITY", 20_000.0),
            hit("BIT=F", "FUTURE", 50_000.0),
            hit("BITO", "ETF", 25_000.0),
        ]),
    );
    let config = SearchConfig {
        strategy: SearchStrategy::Remote,
        ..SearchConfig::default()
    };
    let search = SymbolSearch::new(
        Arc::new(ReferenceTable::builtin()),
        Arc::new(provider),
        &config,
    );

    let result = search.search("bit").await;

    let symbols: Vec<_> = result.quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC-USD", "BITF", "BITO"]);
    assert_eq!(result.quotes[1].shortname, "BITF short");
    assert_eq!(result.quotes[1].longname, "BITF short");
    assert_eq!(result.quotes[2].score, Score::Relevance(25_000.0));
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_lookup() {
    let provider = StubMarketProvider::new()
        .with_search("tsla", Err(MarketError::Network("HTTP 503".to_string())))
        .with_listed("TSLA", "Tesla, Inc.", 250.0);
    let config = SearchConfig {
        strategy: SearchStrategy::Remote,
        ..SearchConfig::default()
    };
    let search = SymbolSearch::new(
        Arc::new(ReferenceTable::builtin()),
        Arc::new(provider),
        &config,
    );

    let result = search.search("tsla").await;

    assert_eq!(result.quotes.len(), 1);
    assert_eq!(result.quotes[0].symbol, "TSLA");
    assert_eq!(result.quotes[0].score, Score::Tier(40_000));
}
