use std::sync::Arc;

use quotegate_api::server::{AppState, serve};
use quotegate_core::config::SearchConfig;
use quotegate_core::market::error::MarketError;
use quotegate_core::relay::port::JsonRelay;
use quotegate_core::test_utils::{StubMarketProvider, StubRelay, sample_candles};
use quotegate_market::service::MarketService;
use quotegate_search::service::SymbolSearch;
use quotegate_search::table::ReferenceTable;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;

struct TestGateway {
    addr: String,
    client: reqwest::Client,
    provider: Arc<StubMarketProvider>,
    relay: Arc<StubRelay>,
    _static_dir: tempfile::TempDir,
}

// 帮助函数：在随机端口启动测试网关
async fn spawn_gateway(provider: StubMarketProvider, relay: StubRelay) -> TestGateway {
    rustls::crypto::ring::default_provider()
        .install_default()
        .ok();
    tracing_subscriber::fmt()
        .with_env_filter("quotegate=debug")
        .with_test_writer()
        .try_init()
        .ok();

    let static_dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(static_dir.path().join("index.html"), "<h1>QuoteGate</h1>").unwrap();

    let provider = Arc::new(provider);
    let relay = Arc::new(relay);
    let market = MarketService::new(provider.clone());
    let search = SymbolSearch::new(
        Arc::new(ReferenceTable::builtin()),
        provider.clone(),
        &SearchConfig::default(),
    );
    let state = AppState::new(
        market,
        search,
        relay.clone() as Arc<dyn JsonRelay>,
        static_dir.path(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        serve(state, listener, std::future::pending()).await.unwrap();
    });

    TestGateway {
        addr: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        provider,
        relay,
        _static_dir: static_dir,
    }
}

async fn default_gateway() -> TestGateway {
    spawn_gateway(StubMarketProvider::new(), StubRelay::new(Ok(json!({})))).await
}

fn header<'a>(resp: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

fn assert_gateway_headers(resp: &reqwest::Response) {
    assert_eq!(header(resp, "access-control-allow-origin"), Some("*"));
    assert_eq!(
        header(resp, "access-control-allow-methods"),
        Some("GET, POST, OPTIONS")
    );
    assert_eq!(
        header(resp, "access-control-allow-headers"),
        Some("Content-Type, Authorization")
    );
    assert_eq!(
        header(resp, "cache-control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(header(resp, "pragma"), Some("no-cache"));
    assert_eq!(header(resp, "expires"), Some("0"));
}

#[tokio::test]
async fn test_options_preflight_on_any_path() -> anyhow::Result<()> {
    let gw = default_gateway().await;

    for path in ["/api/yahoo/quote", "/anything/at/all"] {
        let resp = gw
            .client
            .request(Method::OPTIONS, format!("{}{}", gw.addr, path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_gateway_headers(&resp);
        assert!(resp.text().await?.is_empty());
    }
    assert_eq!(gw.provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_endpoint_is_404_envelope() -> anyhow::Result<()> {
    let gw = default_gateway().await;

    let resp = gw
        .client
        .get(format!("{}/api/yahoo/unknown", gw.addr))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_gateway_headers(&resp);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "Unknown API endpoint: yahoo/unknown");
    Ok(())
}

#[tokio::test]
async fn test_unsupported_method_is_405() -> anyhow::Result<()> {
    let gw = default_gateway().await;

    let resp = gw
        .client
        .post(format!("{}/api/yahoo/quote?symbols=AAPL", gw.addr))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_gateway_headers(&resp);
    assert_eq!(gw.provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_quote_batch_isolates_failures() -> anyhow::Result<()> {
    let provider = StubMarketProvider::new()
        .with_listed("AAPL", "Apple Inc.", 190.0)
        .with_listed("MSFT", "Microsoft Corporation", 410.0);
    let gw = spawn_gateway(provider, StubRelay::new(Ok(json!({})))).await;

    let resp = gw
        .client
        .get(format!("{}/api/yahoo/quote?symbols=AAPL,BOGUS,,MSFT", gw.addr))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_gateway_headers(&resp);
    let body: Value = resp.json().await?;
    let result = body["quoteResponse"]["result"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(result.len(), 3);
    assert_eq!(result[0]["symbol"], "AAPL");
    assert_eq!(result[0]["regularMarketPrice"].as_f64(), Some(190.0));
    assert_eq!(result[1]["symbol"], "BOGUS");
    assert_eq!(result[1]["regularMarketPrice"].as_f64(), Some(0.0));
    assert!(result[1]["error"].is_string());
    assert_eq!(result[2]["symbol"], "MSFT");
    assert!(body["quoteResponse"]["error"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_chart_rows_and_empty_history() -> anyhow::Result<()> {
    let provider = StubMarketProvider::new()
        .with_history("AAPL", Ok(sample_candles(3)))
        .with_history("IPO", Ok(Vec::new()));
    let gw = spawn_gateway(provider, StubRelay::new(Ok(json!({})))).await;

    let body: Value = gw
        .client
        .get(format!("{}/api/yahoo/chart/AAPL?range=5d&interval=1d", gw.addr))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["chart"]["result"][0]["timestamp"].as_array().map(Vec::len), Some(3));

    let resp = gw
        .client
        .get(format!("{}/api/yahoo/chart/IPO", gw.addr))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert!(body["chart"]["result"].is_null());
    assert_eq!(body["chart"]["error"]["description"], "No data found");
    Ok(())
}

#[tokio::test]
async fn test_chart_upstream_failure_is_500_envelope() -> anyhow::Result<()> {
    let provider = StubMarketProvider::new()
        .with_history("AAPL", Err(MarketError::Network("HTTP 502".to_string())));
    let gw = spawn_gateway(provider, StubRelay::new(Ok(json!({})))).await;

    let resp = gw
        .client
        .get(format!("{}/api/yahoo/chart/AAPL", gw.addr))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_gateway_headers(&resp);
    let body: Value = resp.json().await?;
    assert_eq!(body, json!({ "error": "Network error: HTTP 502" }));
    Ok(())
}

#[tokio::test]
async fn test_search_decodes_query() -> anyhow::Result<()> {
    let gw = default_gateway().await;

    let body: Value = gw
        .client
        .get(format!("{}/api/yahoo/search?q=apple+inc", gw.addr))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["quotes"][0]["symbol"], "AAPL");
    assert_eq!(body["quotes"][0]["quoteType"], "EQUITY");
    assert!(body["quotes"][0]["score"].is_u64());
    assert!(body["news"].as_array().is_some_and(Vec::is_empty));

    let body: Value = gw
        .client
        .get(format!("{}/api/yahoo/search?q=", gw.addr))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body, json!({ "quotes": [], "news": [] }));
    Ok(())
}

#[tokio::test]
async fn test_market_summary_and_trending() -> anyhow::Result<()> {
    let provider = StubMarketProvider::new().with_listed("^GSPC", "S&P 500", 5000.0);
    let gw = spawn_gateway(provider, StubRelay::new(Ok(json!({})))).await;

    let body: Value = gw
        .client
        .get(format!("{}/api/yahoo/trending", gw.addr))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(
        body["finance"]["result"][0]["quotes"].as_array().map(Vec::len),
        Some(8)
    );
    assert_eq!(gw.provider.calls(), 0);

    let body: Value = gw
        .client
        .get(format!("{}/api/yahoo/market-summary", gw.addr))
        .send()
        .await?
        .json()
        .await?;
    let result = &body["marketSummaryResponse"]["result"];
    assert_eq!(result.as_array().map(Vec::len), Some(1));
    assert_eq!(result[0]["shortName"], "S&P 500");
    Ok(())
}

#[tokio::test]
async fn test_coingecko_passthrough_is_verbatim() -> anyhow::Result<()> {
    let upstream = json!({ "bitcoin": { "usd": 65000 } });
    let gw = spawn_gateway(StubMarketProvider::new(), StubRelay::new(Ok(upstream.clone()))).await;

    let resp = gw
        .client
        .get(format!(
            "{}/api/coingecko/simple/price?ids=bitcoin&vs_currencies=usd",
            gw.addr
        ))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body, upstream);
    assert_eq!(
        gw.relay.forwarded(),
        vec![(
            "simple/price".to_string(),
            Some("ids=bitcoin&vs_currencies=usd".to_string())
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_coingecko_failure_is_500_envelope() -> anyhow::Result<()> {
    let relay = StubRelay::new(Err(MarketError::Timeout("coingecko".to_string())));
    let gw = spawn_gateway(StubMarketProvider::new(), relay).await;

    let resp = gw
        .client
        .get(format!("{}/api/coingecko/ping", gw.addr))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "Timeout: coingecko");
    Ok(())
}

#[tokio::test]
async fn test_static_files_carry_gateway_headers() -> anyhow::Result<()> {
    let gw = default_gateway().await;

    let resp = gw
        .client
        .get(format!("{}/index.html", gw.addr))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_gateway_headers(&resp);
    assert_eq!(resp.text().await?, "<h1>QuoteGate</h1>");

    let resp = gw.client.get(format!("{}/", gw.addr)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = gw
        .client
        .get(format!("{}/missing.js", gw.addr))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_gateway_headers(&resp);
    Ok(())
}
