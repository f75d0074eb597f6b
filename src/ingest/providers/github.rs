// src/ingest/providers/github.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use super::{element_text, get_text, record, selector};
use crate::ingest::types::{Record, Source, SourceError};

const URL: &str = "https://github.com/trending";
const BASE: &str = "https://github.com";

/// GitHub trending repositories (HTML).
pub struct GithubTrending {
    client: Client,
    url: String,
}

impl GithubTrending {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

/// Titles read `owner/repo - description`; the repo slug has its inner
/// whitespace removed because the page splits it across lines.
pub fn parse_github(body: &str) -> Result<Vec<Record>, SourceError> {
    let doc = Html::parse_document(body);
    let row_sel = selector("article.Box-row")?;
    let link_sel = selector("h2 a")?;
    let desc_sel = selector("p")?;

    let mut out = Vec::new();
    for row in doc.select(&row_sel) {
        let Some(a) = row.select(&link_sel).next() else {
            continue;
        };
        let repo: String = element_text(&a).split_whitespace().collect();
        let href = a.value().attr("href").unwrap_or_default();
        if repo.is_empty() || href.is_empty() {
            continue;
        }
        let desc = row
            .select(&desc_sel)
            .next()
            .map(|p| element_text(&p))
            .unwrap_or_default();
        let desc = desc.trim();
        let title = if desc.is_empty() {
            repo
        } else {
            format!("{repo} - {desc}")
        };
        out.extend(record(&title, &format!("{BASE}{href}")));
    }
    Ok(out)
}

#[async_trait]
impl Source for GithubTrending {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let headers = [("Referer", "https://github.com/explore")];
        let body = get_text(&self.client, &self.url, &headers, timeout).await?;
        parse_github(&body)
    }
}
