// src/ingest/providers/pojie52.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::Html;

use super::{element_text, get_text_with_charset, record, selector};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://www.52pojie.cn/forum.php?mod=guide&view=hot";
const BASE: &str = "https://www.52pojie.cn/";

/// 52pojie forum hot threads (Discuz HTML, served as GBK).
pub struct Pojie52Hot {
    client: Client,
    url: String,
}

impl Pojie52Hot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

/// One record per thread body; separator rows without an `a.xst` link are skipped.
/// Thread links are relative to the forum root.
pub fn parse_pojie52(body: &str) -> Result<Vec<Record>, SourceError> {
    let doc = Html::parse_document(body);
    let thread_sel = selector("#threadlist .bm_c tbody")?;
    let link_sel = selector("tr th a.xst")?;
    let base = Url::parse(BASE).map_err(SourceError::parse)?;

    let mut out = Vec::new();
    for tbody in doc.select(&thread_sel) {
        let Some(a) = tbody.select(&link_sel).next() else {
            continue;
        };
        let Some(link) = a.value().attr("href").and_then(|h| base.join(h).ok()) else {
            continue;
        };
        out.extend(record(&element_text(&a), link.as_str()));
    }
    Ok(out)
}

#[async_trait]
impl Source for Pojie52Hot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        // the forum does not always declare its charset
        let body = get_text_with_charset(&self.client, &self.url, &[], timeout, "gbk").await?;
        parse_pojie52(&body)
    }
}
