//! # 请求分发
//!
//! 网关只注册一个 fallback 处理器：`/api/` 前缀下的请求按 [`ApiRoute`] 分发，
//! 其余请求交给静态文件目录。

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::error::ApiError;
use crate::router::{ApiRoute, api_path, parse_query};
use crate::routes::{coingecko, yahoo};
use crate::server::AppState;

/// # Summary
/// 网关入口。
///
/// # Logic
/// 1. 仅接受 `GET`/`HEAD`，其余方法返回 405（`OPTIONS` 已由中间件应答）。
/// 2. API 路径解析失败返回 404 `Unknown API endpoint`。
/// 3. 非 API 路径交给静态文件服务。
pub async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let method = req.method().clone();
    if method != Method::GET && method != Method::HEAD {
        return ApiError::MethodNotAllowed(method.to_string()).into_response();
    }

    let path = req.uri().path().to_string();
    let Some(api) = api_path(&path) else {
        return serve_static(&state, req).await;
    };

    let Some(route) = ApiRoute::resolve(api) else {
        info!("Unknown API endpoint: {}", api);
        return ApiError::NotFound(api.to_string()).into_response();
    };

    let raw_query = req.uri().query();
    let params = parse_query(raw_query);
    info!("API request: {} with params: {:?}", api, params);

    match route {
        ApiRoute::Chart { symbol } => yahoo::chart(&state, &symbol, &params).await.into_response(),
        ApiRoute::Quote => yahoo::quote(&state, &params).await.into_response(),
        ApiRoute::Search => yahoo::search(&state, &params).await.into_response(),
        ApiRoute::MarketSummary => yahoo::market_summary(&state).await.into_response(),
        ApiRoute::Trending => yahoo::trending(&state).into_response(),
        ApiRoute::CoinGecko { path } => coingecko::passthrough(&state, &path, raw_query)
            .await
            .into_response(),
    }
}

async fn serve_static(state: &AppState, req: Request) -> Response {
    let mut files = state.static_files.clone();
    match files.try_call(req).await {
        Ok(response) => response.map(Body::new),
        Err(e) => {
            tracing::error!("Static file error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
