// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::providers::DEFAULT_USER_AGENT;

pub const ENV_CONFIG_PATH: &str = "CRAWLER_CONFIG_PATH";
pub const ENV_INTERVAL_SECS: &str = "CRAWLER_INTERVAL_SECS";
pub const ENV_SNAPSHOT_PATH: &str = "CRAWLER_SNAPSHOT_PATH";

pub const DEFAULT_CONFIG_TOML: &str = "config/crawler.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/crawler.json";

fn default_interval_secs() -> u64 {
    600
}
fn default_snapshot_path() -> PathBuf {
    PathBuf::from("result.json")
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_enabled() -> bool {
    true
}

/// Per-source overrides, keyed by the source's config key (e.g. `github`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Scheduler period. The first cycle runs immediately at startup.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Used for sources without their own timeout and without a built-in one.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSettings>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            snapshot_path: default_snapshot_path(),
            default_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            sources: BTreeMap::new(),
        }
    }
}

impl CrawlerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.sources.get(key).map(|s| s.enabled).unwrap_or(true)
    }

    /// Explicit per-source value, else the built-in default for that source,
    /// else `default_timeout_secs`. Never below one second.
    pub fn timeout_for(&self, key: &str, builtin: Option<Duration>) -> Duration {
        let explicit = self
            .sources
            .get(key)
            .and_then(|s| s.timeout_secs)
            .map(Duration::from_secs);
        explicit
            .or(builtin)
            .unwrap_or_else(|| Duration::from_secs(self.default_timeout_secs))
            .max(Duration::from_secs(1))
    }

    /// Apply `CRAWLER_INTERVAL_SECS` / `CRAWLER_SNAPSHOT_PATH`. Empty, zero or
    /// unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(secs) = parse_secs_env(std::env::var(ENV_INTERVAL_SECS).ok()) {
            self.interval_secs = secs;
        }
        if let Ok(p) = std::env::var(ENV_SNAPSHOT_PATH) {
            let p = p.trim();
            if !p.is_empty() {
                self.snapshot_path = PathBuf::from(p);
            }
        }
    }
}

fn parse_secs_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<CrawlerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading crawler config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing crawler config {}", path.display()))
}

/// Load config using env var + fallbacks, then apply env overrides:
/// 1) $CRAWLER_CONFIG_PATH
/// 2) config/crawler.toml
/// 3) config/crawler.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<CrawlerConfig> {
    let mut cfg = load_file_default()?;
    cfg.apply_env_overrides();
    Ok(cfg)
}

fn load_file_default() -> Result<CrawlerConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_CONFIG_TOML);
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_CONFIG_JSON);
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Ok(CrawlerConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<CrawlerConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            if let Ok(v) = serde_json::from_str(s) {
                return Ok(v);
            }
            toml::from_str(s).map_err(|e| anyhow!("unsupported crawler config format: {e}"))
        }
    }
}
