// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod registry;
pub mod scheduler;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::ingest::registry::{RegisteredSource, Registry};
use crate::ingest::types::{Snapshot, SourceError, SourceResult};
use crate::store::{SnapshotStore, SnapshotWriteError};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("crawl_cycles_total", "Completed crawl cycles.");
        describe_counter!(
            "crawl_source_errors_total",
            "Per-source fetch/parse failures, labelled by source."
        );
        describe_counter!("crawl_records_total", "Records collected across all sources.");
        describe_counter!(
            "crawl_ticks_skipped_total",
            "Scheduler ticks dropped because a cycle was still running."
        );
        describe_counter!(
            "snapshot_write_errors_total",
            "Snapshots that failed to publish."
        );
        describe_histogram!("crawl_cycle_ms", "Wall-clock duration of a full cycle in ms.");
        describe_histogram!("crawl_source_fetch_ms", "Per-source fetch duration in ms.");
        describe_gauge!("crawl_last_cycle_ts", "Unix ts when the last cycle finished.");
    });
}

/// Normalize scraped text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace (incl. nbsp)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 4) Length cap: 500 chars
    if out.chars().count() > 500 {
        out = out.chars().take(500).collect();
    }

    out
}

/// Fetch one source under its timeout. Whatever happens becomes a `SourceResult`.
async fn fetch_one(entry: RegisteredSource) -> SourceResult {
    let t0 = Instant::now();
    let outcome = match tokio::time::timeout(entry.timeout, entry.source.fetch(entry.timeout)).await
    {
        Ok(res) => res,
        Err(_) => Err(SourceError::Timeout(entry.timeout)),
    };
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("crawl_source_fetch_ms").record(ms);

    match outcome {
        Ok(records) => {
            info!(
                target: "ingest",
                source = %entry.name,
                records = records.len(),
                elapsed_ms = ms as u64,
                "source ok"
            );
            SourceResult::success(entry.name, records)
        }
        Err(e) => {
            warn!(
                target: "ingest",
                source = %entry.name,
                error = %e,
                parse = e.is_parse(),
                elapsed_ms = ms as u64,
                "source failed"
            );
            counter!("crawl_source_errors_total", "source" => entry.name.clone()).increment(1);
            SourceResult::failure(entry.name, &e)
        }
    }
}

/// Run one cycle: fetch every registered source concurrently and wait for all of
/// them. The snapshot holds exactly one result per source, sorted by name.
pub async fn run_cycle(registry: &Registry) -> Snapshot {
    ensure_metrics_described();
    let t0 = Instant::now();
    info!(target: "ingest", sources = registry.len(), "cycle started");

    // One task per source so a slow or panicking plugin cannot stall its siblings.
    let handles: Vec<_> = registry
        .entries()
        .iter()
        .cloned()
        .map(|entry| {
            let name = entry.name.clone();
            (name, tokio::spawn(fetch_one(entry)))
        })
        .collect();

    let (names, tasks): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
    let joined = join_all(tasks).await;

    let results = names
        .into_iter()
        .zip(joined)
        .map(|(name, res)| match res {
            Ok(r) => r,
            Err(join_err) => {
                let err = SourceError::Aborted(join_err.to_string());
                warn!(target: "ingest", source = %name, error = %err, "source task aborted");
                counter!("crawl_source_errors_total", "source" => name.clone()).increment(1);
                SourceResult::failure(name, &err)
            }
        })
        .collect();

    let snapshot = Snapshot::from_results(results);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    counter!("crawl_cycles_total").increment(1);
    counter!("crawl_records_total").increment(snapshot.record_count() as u64);
    histogram!("crawl_cycle_ms").record(ms);
    gauge!("crawl_last_cycle_ts").set(snapshot.generated_at.timestamp() as f64);

    info!(
        target: "ingest",
        sources = snapshot.results.len(),
        failed = snapshot.failed_count(),
        records = snapshot.record_count(),
        elapsed_ms = ms as u64,
        "cycle finished"
    );
    snapshot
}

/// Owns everything a cycle needs: which sources to ask and where to publish.
pub struct Crawler {
    registry: Registry,
    store: Arc<SnapshotStore>,
}

impl Crawler {
    pub fn new(registry: Registry, store: Arc<SnapshotStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run a cycle and publish it. On a write error the previously published
    /// snapshot stays visible.
    pub async fn run_and_publish(&self) -> Result<Snapshot, SnapshotWriteError> {
        let snapshot = run_cycle(&self.registry).await;
        if let Err(e) = self.store.write(&snapshot).await {
            counter!("snapshot_write_errors_total").increment(1);
            return Err(e);
        }
        Ok(snapshot)
    }
}
