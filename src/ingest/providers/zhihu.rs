// src/ingest/providers/zhihu.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_text, parse_json, record};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://www.zhihu.com/api/v3/feed/topstory/hot-lists/total?limit=50&desktop=true";

#[derive(Debug, Deserialize)]
struct Resp {
    data: Vec<Item>,
}
// Ads and promoted cards come without a target; those items are skipped.
#[derive(Debug, Deserialize)]
struct Item {
    target: Option<Target>,
}
#[derive(Debug, Deserialize)]
struct Target {
    title_area: Option<Text>,
    link: Option<Link>,
}
#[derive(Debug, Deserialize)]
struct Text {
    #[serde(default)]
    text: String,
}
#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    url: String,
}

pub struct ZhihuHot {
    client: Client,
    url: String,
}

impl ZhihuHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

pub fn parse_zhihu(body: &str) -> Result<Vec<Record>, SourceError> {
    let resp: Resp = parse_json(body)?;
    Ok(resp
        .data
        .into_iter()
        .filter_map(|it| {
            let target = it.target?;
            let title = target.title_area?.text;
            let link = target.link?.url;
            record(&title, &link)
        })
        .collect())
}

#[async_trait]
impl Source for ZhihuHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let headers = [
            ("x-api-version", "3.0.76"),
            ("x-requested-with", "fetch"),
        ];
        let body = get_text(&self.client, &self.url, &headers, timeout).await?;
        parse_zhihu(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_skips_incomplete_items() {
        let body = r#"{"data":[
            {"target":{"title_area":{"text":"first"},"link":{"url":"https://www.zhihu.com/question/1"}}},
            {"target":{"title_area":{"text":"no link"}}},
            {"target":{"title_area":{"text":"third"},"link":{"url":"https://www.zhihu.com/question/3"}}}
        ]}"#;
        let recs = parse_zhihu(body).unwrap();
        let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "third"]);
    }

    #[test]
    fn item_without_target_does_not_sink_the_list() {
        let body = r#"{"data":[
            {"target":{"title_area":{"text":"first"},"link":{"url":"https://www.zhihu.com/question/1"}}},
            {"card_id":"ad"},
            {"target":{"title_area":{},"link":{"url":"https://www.zhihu.com/question/2"}}}
        ]}"#;
        let recs = parse_zhihu(body).unwrap();
        assert_eq!(recs, vec![Record::new("first", "https://www.zhihu.com/question/1")]);
    }
}
