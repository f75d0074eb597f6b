// src/ingest/registry.rs
//! The fixed set of sources a cycle fans out to.
//!
//! Built-in sources are the variants of [`SourceKind`]; adding one means adding a
//! variant, its match arms, and the plugin module. Nothing is looked up by name
//! at runtime.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::ingest::config::CrawlerConfig;
use crate::ingest::providers::{
    csdn::CsdnHot, douban::DoubanHot, douyin::DouyinHot, github::GithubTrending,
    netease::NeteaseRising, pojie52::Pojie52Hot, tieba::TiebaHot, weibo::WeiboHot,
    weread::WereadRising, zhihu::ZhihuHot,
};
use crate::ingest::types::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Weibo,
    Zhihu,
    Tieba,
    Douban,
    Github,
    Netease,
    Csdn,
    Weread,
    Douyin,
    Pojie52,
}

impl SourceKind {
    pub const ALL: [SourceKind; 10] = [
        SourceKind::Weibo,
        SourceKind::Zhihu,
        SourceKind::Tieba,
        SourceKind::Douban,
        SourceKind::Github,
        SourceKind::Netease,
        SourceKind::Csdn,
        SourceKind::Weread,
        SourceKind::Douyin,
        SourceKind::Pojie52,
    ];

    /// Key used in the `[sources.<key>]` config tables.
    pub fn key(self) -> &'static str {
        match self {
            SourceKind::Weibo => "weibo",
            SourceKind::Zhihu => "zhihu",
            SourceKind::Tieba => "tieba",
            SourceKind::Douban => "douban",
            SourceKind::Github => "github",
            SourceKind::Netease => "netease",
            SourceKind::Csdn => "csdn",
            SourceKind::Weread => "weread",
            SourceKind::Douyin => "douyin",
            SourceKind::Pojie52 => "52pojie",
        }
    }

    /// Name published as `hot_name` in the snapshot.
    pub fn display_name(self) -> &'static str {
        match self {
            SourceKind::Weibo => "新浪微博",
            SourceKind::Zhihu => "知乎热榜",
            SourceKind::Tieba => "贴吧",
            SourceKind::Douban => "豆瓣热榜",
            SourceKind::Github => "GitHub Trending",
            SourceKind::Netease => "云音乐飙升榜",
            SourceKind::Csdn => "CSDN热榜",
            SourceKind::Weread => "微信读书飙升榜",
            SourceKind::Douyin => "抖音热榜",
            SourceKind::Pojie52 => "吾爱破解",
        }
    }

    pub fn default_timeout(self) -> Duration {
        let secs = match self {
            SourceKind::Zhihu | SourceKind::Douyin => 5,
            SourceKind::Github => 20,
            _ => 10,
        };
        Duration::from_secs(secs)
    }

    pub fn build(self, client: Client) -> Arc<dyn Source> {
        match self {
            SourceKind::Weibo => Arc::new(WeiboHot::new(client)),
            SourceKind::Zhihu => Arc::new(ZhihuHot::new(client)),
            SourceKind::Tieba => Arc::new(TiebaHot::new(client)),
            SourceKind::Douban => Arc::new(DoubanHot::new(client)),
            SourceKind::Github => Arc::new(GithubTrending::new(client)),
            SourceKind::Netease => Arc::new(NeteaseRising::new(client)),
            SourceKind::Csdn => Arc::new(CsdnHot::new(client)),
            SourceKind::Weread => Arc::new(WereadRising::new(client)),
            SourceKind::Douyin => Arc::new(DouyinHot::new(client)),
            SourceKind::Pojie52 => Arc::new(Pojie52Hot::new(client)),
        }
    }
}

#[derive(Clone)]
pub struct RegisteredSource {
    pub name: String,
    pub timeout: Duration,
    pub source: Arc<dyn Source>,
}

impl RegisteredSource {
    pub fn new(name: impl Into<String>, timeout: Duration, source: Arc<dyn Source>) -> Self {
        Self {
            name: name.into(),
            timeout,
            source,
        }
    }
}

impl std::fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry has no sources")]
    Empty,
    #[error("source name {0:?} registered twice")]
    Duplicate(String),
}

/// Ordered, immutable list of sources. Names are unique.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegisteredSource>,
}

impl Registry {
    pub fn new(entries: Vec<RegisteredSource>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::new();
        for e in &entries {
            if !seen.insert(e.name.as_str()) {
                return Err(RegistryError::Duplicate(e.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// All built-in sources enabled in `cfg`, sharing one HTTP client.
    pub fn builtin(cfg: &CrawlerConfig, client: Client) -> Result<Self, RegistryError> {
        let entries = SourceKind::ALL
            .iter()
            .copied()
            .filter(|k| cfg.is_enabled(k.key()))
            .map(|k| {
                RegisteredSource::new(
                    k.display_name(),
                    cfg.timeout_for(k.key(), Some(k.default_timeout())),
                    k.build(client.clone()),
                )
            })
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[RegisteredSource] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Upper bound on one cycle's duration.
    pub fn max_timeout(&self) -> Duration {
        self.entries
            .iter()
            .map(|e| e.timeout)
            .max()
            .unwrap_or_default()
    }
}
