// src/ingest/providers/csdn.rs
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;

use super::{get_text, parse_json, record};
use crate::ingest::types::{Record, Source, SourceError};

const BASE_URL: &str = "https://blog.csdn.net/phoenix/web/blog/hot-rank";
const PAGES: u32 = 4;
const PAGE_SIZE: u32 = 25;

#[derive(Debug, Deserialize)]
struct Resp {
    #[serde(default)]
    data: Vec<Article>,
}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    article_title: String,
    #[serde(default)]
    article_detail_url: String,
}

/// CSDN blog hot rank. The list is paged; pages are fetched together and
/// concatenated in page order.
pub struct CsdnHot {
    client: Client,
    base_url: String,
}

impl CsdnHot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}?page={page}&pageSize={PAGE_SIZE}&type=", self.base_url)
    }
}

pub fn parse_csdn_page(body: &str) -> Result<Vec<Record>, SourceError> {
    let resp: Resp = parse_json(body)?;
    Ok(resp
        .data
        .iter()
        .filter_map(|a| record(&a.article_title, &a.article_detail_url))
        .collect())
}

/// A failing page is skipped; the source only fails when no page succeeded.
fn merge_pages(pages: Vec<Result<Vec<Record>, SourceError>>) -> Result<Vec<Record>, SourceError> {
    let mut out = Vec::new();
    let mut first_err = None;
    let mut any_ok = false;
    for (i, page) in pages.into_iter().enumerate() {
        match page {
            Ok(mut recs) => {
                any_ok = true;
                out.append(&mut recs);
            }
            Err(e) => {
                tracing::debug!(page = i, error = %e, "csdn page failed");
                first_err.get_or_insert(e);
            }
        }
    }
    match (any_ok, first_err) {
        (false, Some(e)) => Err(e),
        _ => Ok(out),
    }
}

#[async_trait]
impl Source for CsdnHot {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let pages = join_all((0..PAGES).map(|page| async move {
            let body = get_text(&self.client, &self.page_url(page), &[], timeout).await?;
            parse_csdn_page(&body)
        }))
        .await;
        merge_pages(pages)
    }
}
