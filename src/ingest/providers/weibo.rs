// src/ingest/providers/weibo.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{get_text, parse_json, record};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://m.weibo.cn/api/container/getIndex?containerid=106003type%3D25%26t%3D3%26disable_hot%3D1%26filter_type%3Drealtimehot&title=%E5%BE%AE%E5%8D%9A%E7%83%AD%E6%90%9C&luicode=10000011&lfid=231583";
const SEARCH_URL: &str = "https://s.weibo.com/weibo";

#[derive(Debug, Deserialize)]
struct Resp {
    data: Data,
}
#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    cards: Vec<Card>,
}
#[derive(Debug, Deserialize)]
struct Card {
    #[serde(default)]
    card_group: Vec<Entry>,
}
#[derive(Debug, Deserialize)]
struct Entry {
    desc: Option<String>,
}

/// Weibo realtime hot search, via the mobile container API.
pub struct WeiboHot {
    client: Client,
    url: String,
}

impl WeiboHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

/// Topics link to a `#topic#` search, which is how Weibo addresses them.
fn search_link(topic: &str) -> String {
    Url::parse_with_params(SEARCH_URL, &[("q", format!("#{topic}#"))])
        .map(|u| u.to_string())
        .unwrap_or_default()
}

pub fn parse_weibo(body: &str) -> Result<Vec<Record>, SourceError> {
    let resp: Resp = parse_json(body)?;
    let card = resp
        .data
        .cards
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::parse("weibo: no cards"))?;
    Ok(card
        .card_group
        .iter()
        .filter_map(|e| e.desc.as_deref())
        .filter_map(|t| record(t, &search_link(t.trim())))
        .collect())
}

#[async_trait]
impl Source for WeiboHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let body = get_text(&self.client, &self.url, &[], timeout).await?;
        parse_weibo(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_card_group_becomes_search_links() {
        let body = r#"{"data":{"cards":[{"card_group":[{"desc":"春节 档"},{"desc":"天气"},{"pic":"x"}]}]}}"#;
        let recs = parse_weibo(body).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "春节 档");
        assert!(recs[0].link.starts_with("https://s.weibo.com/weibo?q=%23"));
        assert!(recs[0].link.ends_with("%23"));
    }

    #[test]
    fn missing_cards_is_parse_error() {
        let err = parse_weibo(r#"{"data":{"cards":[]}}"#).unwrap_err();
        assert!(err.is_parse());
        assert!(parse_weibo("<html>").unwrap_err().is_parse());
    }
}
