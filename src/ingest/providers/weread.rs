// src/ingest/providers/weread.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use super::{element_text, get_text, record, selector};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://weread.qq.com/web/category/rising";
const BASE: &str = "https://weread.qq.com";

pub struct WereadRising {
    client: Client,
    url: String,
}

impl WereadRising {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

pub fn parse_weread(body: &str) -> Result<Vec<Record>, SourceError> {
    let doc = Html::parse_document(body);
    let item_sel = selector(".ranking_content_bookList li.wr_bookList_item")?;
    let title_sel = selector("p.wr_bookList_item_title")?;
    let link_sel = selector("a.wr_bookList_item_link")?;

    let mut out = Vec::new();
    for item in doc.select(&item_sel) {
        let title = item
            .select(&title_sel)
            .next()
            .map(|p| element_text(&p))
            .unwrap_or_default();
        let href = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = href {
            out.extend(record(&title, &format!("{BASE}{href}")));
        }
    }
    Ok(out)
}

#[async_trait]
impl Source for WereadRising {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let body = get_text(&self.client, &self.url, &[], timeout).await?;
        parse_weread(&body)
    }
}
