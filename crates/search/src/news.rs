//! # 新闻条目抽取
//!
//! 上游新闻有两种形态：嵌套形态 `{ "id", "content": { ... } }`（ISO 时间、
//! `provider.displayName`、`canonicalUrl.url`）与 Yahoo 搜索接口的扁平形态
//! （`uuid`、`publisher`、`link`、`providerPublishTime`）。两者统一为 [`NewsItem`]。

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

const DEFAULT_PUBLISHER: &str = "Unknown";
const DEFAULT_TYPE: &str = "STORY";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThumbnailResolution {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub resolutions: Vec<ThumbnailResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub uuid: String,
    pub title: String,
    pub summary: String,
    pub publisher: String,
    pub link: String,
    pub provider_publish_time: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail: Option<Thumbnail>,
    pub related_tickers: Vec<String>,
}

fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// 标题的稳定摘要，取 SHA-256 前 16 个十六进制字符
fn title_digest(title: &str) -> String {
    let digest = hex::encode(Sha256::digest(title.as_bytes()));
    digest.chars().take(16).collect()
}

fn publish_time(content: &Value) -> i64 {
    if let Some(ts) = content.get("providerPublishTime").and_then(Value::as_i64) {
        return ts;
    }
    text(content, "/pubDate")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.timestamp())
        .unwrap_or_default()
}

fn thumbnail(content: &Value) -> Option<Thumbnail> {
    let first = content.pointer("/thumbnail/resolutions/0")?;
    Some(Thumbnail {
        resolutions: vec![ThumbnailResolution {
            url: text(first, "/url").unwrap_or_default().to_string(),
        }],
    })
}

/// # Summary
/// 将一条上游新闻转换为统一结构。
///
/// # Logic
/// 1. 存在 `content` 对象时以其为主体，否则使用文章本身。
/// 2. 各字段按"嵌套字段 → 扁平字段 → 默认值"依次回退。
/// 3. 缺少任何标识时以标题摘要作为 uuid。
///
/// # Arguments
/// * `article`: 上游新闻 JSON。
///
/// # Returns
/// 统一的新闻条目，永不失败。
pub fn extract_news(article: &Value) -> NewsItem {
    let content = article
        .get("content")
        .filter(|c| c.is_object())
        .unwrap_or(article);
    let title = text(content, "/title").unwrap_or_default().to_string();

    let uuid = text(content, "/id")
        .or_else(|| text(article, "/id"))
        .or_else(|| text(content, "/uuid"))
        .map(str::to_string)
        .unwrap_or_else(|| title_digest(&title));

    let publisher = text(content, "/provider/displayName")
        .or_else(|| text(content, "/publisher"))
        .unwrap_or(DEFAULT_PUBLISHER)
        .to_string();

    let link = text(content, "/canonicalUrl/url")
        .or_else(|| text(content, "/clickThroughUrl/url"))
        .or_else(|| text(content, "/link"))
        .unwrap_or_default()
        .to_string();

    let kind = text(content, "/contentType")
        .or_else(|| text(content, "/type"))
        .unwrap_or(DEFAULT_TYPE)
        .to_string();

    let related_tickers = content
        .get("relatedTickers")
        .and_then(Value::as_array)
        .map(|tickers| {
            tickers
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    NewsItem {
        uuid,
        summary: text(content, "/summary").unwrap_or_default().to_string(),
        title,
        publisher,
        link,
        provider_publish_time: publish_time(content),
        kind,
        thumbnail: thumbnail(content),
        related_tickers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_shape() {
        let article = json!({
            "id": "outer-id",
            "content": {
                "id": "abc-123",
                "title": "Apple beats estimates",
                "summary": "Strong quarter",
                "pubDate": "2024-05-02T20:30:00Z",
                "contentType": "VIDEO",
                "provider": { "displayName": "Reuters" },
                "canonicalUrl": { "url": "https://example.com/a" },
                "thumbnail": { "resolutions": [{ "url": "https://img/1.jpg" }, { "url": "https://img/2.jpg" }] }
            }
        });

        let item = extract_news(&article);
        assert_eq!(item.uuid, "abc-123");
        assert_eq!(item.publisher, "Reuters");
        assert_eq!(item.link, "https://example.com/a");
        assert_eq!(item.provider_publish_time, 1_714_681_800);
        assert_eq!(item.kind, "VIDEO");
        let thumb = item.thumbnail.unwrap();
        assert_eq!(thumb.resolutions.len(), 1);
        assert_eq!(thumb.resolutions[0].url, "https://img/1.jpg");
    }

    #[test]
    fn test_flat_shape() {
        let article = json!({
            "uuid": "flat-1",
            "title": "Chipmakers rally",
            "publisher": "Bloomberg",
            "link": "https://example.com/b",
            "providerPublishTime": 1_700_000_000,
            "type": "STORY",
            "relatedTickers": ["NVDA", "AMD"]
        });

        let item = extract_news(&article);
        assert_eq!(item.uuid, "flat-1");
        assert_eq!(item.publisher, "Bloomberg");
        assert_eq!(item.provider_publish_time, 1_700_000_000);
        assert_eq!(item.related_tickers, vec!["NVDA", "AMD"]);
        assert!(item.thumbnail.is_none());
    }

    #[test]
    fn test_defaults_and_stable_digest() {
        let article = json!({ "content": { "title": "Untitled", "pubDate": "not a date" } });

        let first = extract_news(&article);
        let second = extract_news(&article);
        assert_eq!(first.uuid.len(), 16);
        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.publisher, "Unknown");
        assert_eq!(first.kind, "STORY");
        assert_eq!(first.provider_publish_time, 0);

        let json = serde_json::to_value(&first).unwrap();
        assert!(json["thumbnail"].is_null());
        assert_eq!(json["type"], "STORY");
        assert!(json.get("providerPublishTime").is_some());
    }
}
