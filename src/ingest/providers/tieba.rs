// src/ingest/providers/tieba.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_text, parse_json, record};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://tieba.baidu.com/hottopic/browse/topicList";

#[derive(Debug, Deserialize)]
struct Resp {
    data: Data,
}
#[derive(Debug, Deserialize)]
struct Data {
    bang_topic: BangTopic,
}
#[derive(Debug, Deserialize)]
struct BangTopic {
    #[serde(default)]
    topic_list: Vec<Topic>,
}
#[derive(Debug, Deserialize)]
struct Topic {
    #[serde(default)]
    topic_name: String,
    #[serde(default)]
    topic_url: String,
}

pub struct TiebaHot {
    client: Client,
    url: String,
}

impl TiebaHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

pub fn parse_tieba(body: &str) -> Result<Vec<Record>, SourceError> {
    let resp: Resp = parse_json(body)?;
    Ok(resp
        .data
        .bang_topic
        .topic_list
        .iter()
        .filter_map(|t| record(&t.topic_name, &html_escape::decode_html_entities(&t.topic_url)))
        .collect())
}

#[async_trait]
impl Source for TiebaHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let body = get_text(&self.client, &self.url, &[], timeout).await?;
        parse_tieba(&body)
    }
}
