use quotegate_core::config::UpstreamConfig;
use quotegate_core::market::error::MarketError;
use quotegate_core::relay::port::JsonRelay;
use quotegate_feed::coingecko::CoinGeckoRelay;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 对每个连接都回复固定 HTTP 报文的本地上游
async fn canned_upstream(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _read = socket.read(&mut buf).await;
                let _written = socket.write_all(response.as_bytes()).await;
                let _closed = socket.shutdown().await;
            });
        }
    });
    format!("http://{}/api/v3", addr)
}

/// # Summary
/// 上游返回非 2xx 时，错误信息带上状态码与完整上游地址。
#[tokio::test]
async fn test_non_success_status_names_upstream_url() {
    let base = canned_upstream(
        "HTTP/1.1 429 Too Many Requests\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let relay = CoinGeckoRelay::new(&UpstreamConfig {
        coingecko_url: base.clone(),
        ..UpstreamConfig::default()
    })
    .unwrap();

    let err = relay
        .forward("simple/price", Some("ids=bitcoin&vs_currencies=usd"))
        .await
        .unwrap_err();

    let MarketError::Network(message) = err else {
        panic!("expected network error, got {:?}", err);
    };
    assert!(message.contains("429"), "{}", message);
    assert!(
        message.contains(&format!("{}/simple/price?ids=bitcoin&vs_currencies=usd", base)),
        "{}",
        message
    );
}

#[tokio::test]
async fn test_json_body_is_passed_through() {
    let base = canned_upstream(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 28\r\nconnection: close\r\n\r\n{\"gecko_says\":\"(V3) To the\"}",
    )
    .await;
    let relay = CoinGeckoRelay::new(&UpstreamConfig {
        coingecko_url: base,
        ..UpstreamConfig::default()
    })
    .unwrap();

    let body = relay.forward("ping", None).await.unwrap();
    assert_eq!(body["gecko_says"], "(V3) To the");
}
