//! # 响应头中间件
//!
//! 为所有响应（含静态文件与错误响应）注入 CORS 与禁止缓存响应头，
//! 并直接以 200 空响应应答 `OPTIONS` 预检，不再进入路由。

use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, EXPIRES, PRAGMA,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// CORS 三项与禁止缓存三项
fn gateway_headers() -> [(HeaderName, &'static str); 6] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
        (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        (PRAGMA, "no-cache"),
        (EXPIRES, "0"),
    ]
}

/// 覆盖写入网关响应头
pub fn apply_headers(headers: &mut HeaderMap) {
    for (name, value) in gateway_headers() {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// # Summary
/// 响应头注入中间件。
///
/// # Logic
/// 1. `OPTIONS` 请求直接返回 200 空响应。
/// 2. 其余请求交给下游处理。
/// 3. 统一覆盖写入 6 个响应头（静态文件自带的缓存头也会被覆盖）。
pub async fn response_headers(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };
    apply_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_headers_overrides_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=3600"));

        apply_headers(&mut headers);

        assert_eq!(headers.len(), 6);
        assert_eq!(
            headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-cache, no-store, must-revalidate")
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
