// src/ingest/providers/douban.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use super::{element_text, get_text, record, selector};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://www.douban.com/group/explore";

/// Douban group explore page (HTML).
pub struct DoubanHot {
    client: Client,
    url: String,
}

impl DoubanHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

pub fn parse_douban(body: &str) -> Result<Vec<Record>, SourceError> {
    let doc = Html::parse_document(body);
    let item_sel = selector(".channel-item")?;
    let link_sel = selector("h3 a")?;

    let mut out = Vec::new();
    for item in doc.select(&item_sel) {
        let Some(a) = item.select(&link_sel).next() else {
            continue;
        };
        if let Some(href) = a.value().attr("href") {
            out.extend(record(&element_text(&a), href));
        }
    }
    Ok(out)
}

#[async_trait]
impl Source for DoubanHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let headers = [("Upgrade-Insecure-Requests", "1")];
        let body = get_text(&self.client, &self.url, &headers, timeout).await?;
        parse_douban(&body)
    }
}
