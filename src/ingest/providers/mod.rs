// src/ingest/providers/mod.rs
//! Built-in source plugins plus the small HTTP/HTML helpers they share.
//!
//! Every plugin splits into an async `fetch` that only does I/O and a pure
//! `parse_*` function from body text to records, so the parsing rules can be
//! exercised against fixtures without a network.

pub mod csdn;
pub mod douban;
pub mod douyin;
pub mod github;
pub mod netease;
pub mod pojie52;
pub mod tieba;
pub mod weibo;
pub mod weread;
pub mod zhihu;

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Selector};
use serde::de::DeserializeOwned;

use crate::ingest::normalize_text;
use crate::ingest::types::{Record, SourceError};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

/// Shared client for all plugins. Timeouts are set per request, not here.
pub fn build_client(user_agent: &str) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| SourceError::Fetch(format!("building http client: {e}")))
}

/// GET `url` and return the body, mapping non-2xx to [`SourceError::Status`].
pub async fn get_text(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    timeout: Duration,
) -> Result<String, SourceError> {
    get_text_with_charset(client, url, headers, timeout, "utf-8").await
}

/// Like [`get_text`], but decodes with `default_charset` when the response
/// does not name one in its `Content-Type`.
pub async fn get_text_with_charset(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    timeout: Duration,
    default_charset: &str,
) -> Result<String, SourceError> {
    let mut req = client.get(url).timeout(timeout);
    for (k, v) in headers {
        req = req.header(*k, *v);
    }
    let resp = req
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(e, timeout))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    resp.text_with_charset(default_charset)
        .await
        .map_err(|e| SourceError::from_reqwest(e, timeout))
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(SourceError::parse)
}

pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::parse(format!("selector {css:?}: {e}")))
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

/// Normalizes title/link and drops items that end up empty.
pub(crate) fn record(title: &str, link: &str) -> Option<Record> {
    let title = normalize_text(title);
    let link = link.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }
    Some(Record::new(title, link))
}
