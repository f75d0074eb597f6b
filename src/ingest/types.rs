// src/ingest/types.rs
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trending item as published by a source, in the source's own ranking order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    #[serde(rename = "href")]
    pub link: String,
}

impl Record {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

fn default_ok() -> bool {
    true
}

/// Outcome of one source for one cycle. A failed fetch still yields an entry,
/// with no records and `ok == false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceResult {
    #[serde(rename = "hot_name")]
    pub source_name: String,
    #[serde(rename = "content", default)]
    pub records: Vec<Record>,
    #[serde(rename = "crawler_time")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl SourceResult {
    pub fn success(source_name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            source_name: source_name.into(),
            records,
            fetched_at: Utc::now(),
            ok: true,
            error_detail: None,
        }
    }

    pub fn failure(source_name: impl Into<String>, err: &SourceError) -> Self {
        Self {
            source_name: source_name.into(),
            records: Vec::new(),
            fetched_at: Utc::now(),
            ok: false,
            error_detail: Some(err.to_string()),
        }
    }
}

/// Everything one cycle produced: exactly one result per registered source,
/// ordered by source name.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub results: Vec<SourceResult>,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds a snapshot, sorting results by name so completion order never leaks out.
    pub fn from_results(mut results: Vec<SourceResult>) -> Self {
        results.sort_by(|a, b| a.source_name.cmp(&b.source_name));
        Self {
            results,
            generated_at: Utc::now(),
        }
    }

    pub fn get(&self, source_name: &str) -> Option<&SourceResult> {
        self.results.iter().find(|r| r.source_name == source_name)
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.ok).count()
    }

    pub fn record_count(&self) -> usize {
        self.results.iter().map(|r| r.records.len()).sum()
    }
}

/// Everything a source plugin can fail with. Never escapes the orchestrator:
/// each error becomes a failed [`SourceResult`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Fetch(String),

    #[error("unexpected http status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected payload: {0}")]
    Parse(String),

    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

impl SourceError {
    pub fn parse(msg: impl std::fmt::Display) -> Self {
        Self::Parse(msg.to_string())
    }

    /// True for payload-shape problems, false for transport-level failures.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl SourceError {
    /// Maps a reqwest failure; `timeout` is the budget the request was sent with.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            return Self::Timeout(timeout);
        }
        if e.is_decode() {
            return Self::Parse(e.to_string());
        }
        match e.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => Self::Fetch(e.to_string()),
        }
    }
}

/// The contract every source plugin implements.
///
/// `timeout` is the budget the registry assigned to this source; plugins pass it to
/// their HTTP requests. The orchestrator enforces it independently as well.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    async fn fetch(&self, timeout: Duration) -> Result<Vec<Record>, SourceError>;
}
