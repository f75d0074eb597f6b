// src/ingest/providers/douyin.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{get_text, parse_json, record};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://www.douyin.com/aweme/v1/web/hot/search/list/?device_platform=webapp&aid=6383&channel=channel_pc_web&detail_list=1&source=6&pc_client_type=1";

#[derive(Debug, Deserialize)]
struct Resp {
    data: Data,
}
#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    word_list: Vec<Word>,
}
#[derive(Debug, Deserialize)]
struct Word {
    #[serde(default)]
    word: String,
    // string on the web API, number on some mirrors
    #[serde(default)]
    sentence_id: Value,
}

pub struct DouyinHot {
    client: Client,
    url: String,
}

impl DouyinHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

pub fn parse_douyin(body: &str) -> Result<Vec<Record>, SourceError> {
    let resp: Resp = parse_json(body)?;
    Ok(resp
        .data
        .word_list
        .iter()
        .filter_map(|w| {
            let id = match &w.sentence_id {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            record(&w.word, &format!("https://www.douyin.com/hot/{id}"))
        })
        .collect())
}

#[async_trait]
impl Source for DouyinHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let headers = [
            ("referer", "https://www.douyin.com/hot"),
            ("accept", "application/json, text/plain, */*"),
        ];
        let body = get_text(&self.client, &self.url, &headers, timeout).await?;
        parse_douyin(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_id_may_be_string_or_number() {
        let body = r#"{"data":{"word_list":[
            {"word":"a","sentence_id":"123"},
            {"word":"b","sentence_id":456},
            {"word":"c","sentence_id":null}
        ]}}"#;
        let recs = parse_douyin(body).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].link, "https://www.douyin.com/hot/123");
        assert_eq!(recs[1].link, "https://www.douyin.com/hot/456");
    }

    #[test]
    fn entry_missing_word_is_skipped() {
        let body = r#"{"data":{"word_list":[
            {"sentence_id":"1"},
            {"word":"b","sentence_id":"2"}
        ]}}"#;
        let recs = parse_douyin(body).unwrap();
        assert_eq!(recs, vec![Record::new("b", "https://www.douyin.com/hot/2")]);
    }
}
