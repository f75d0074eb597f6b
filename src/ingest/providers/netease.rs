// src/ingest/providers/netease.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use super::{element_text, get_text, record, selector};
use crate::ingest::types::{Record, Source, SourceError};

// "rising" chart
const URL: &str = "https://music.163.com/discover/toplist?id=19723756";
const BASE: &str = "https://music.163.com/#";

pub struct NeteaseRising {
    client: Client,
    url: String,
}

impl NeteaseRising {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: URL.to_string(),
        }
    }
}

/// The server renders the song list into a hidden pre-cache block; the visible
/// table is filled in by script.
pub fn parse_netease(body: &str) -> Result<Vec<Record>, SourceError> {
    let doc = Html::parse_document(body);
    let song_sel = selector("#song-list-pre-cache ul.f-hide li a")?;
    Ok(doc
        .select(&song_sel)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            record(&element_text(&a), &format!("{BASE}{href}"))
        })
        .collect())
}

#[async_trait]
impl Source for NeteaseRising {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError> {
        let headers = [("Referer", "https://music.163.com/")];
        let body = get_text(&self.client, &self.url, &headers, timeout).await?;
        parse_netease(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_hidden_song_list() {
        let html = r#"<div id="song-list-pre-cache"><ul class="f-hide">
            <li><a href="/song?id=1">Song A</a></li>
            <li><a href="/song?id=2">Song B</a></li>
        </ul></div>"#;
        let recs = parse_netease(html).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].title, "Song B");
        assert_eq!(recs[1].link, "https://music.163.com/#/song?id=2");
    }
}
