//! Runs a single crawl cycle against the configured sources, publishes the
//! snapshot, and prints a per-source summary. Handy for checking a source by hand.

use std::sync::Arc;

use anyhow::Context;
use hot_list_aggregator::ingest::config::load_config_default;
use hot_list_aggregator::ingest::providers::build_client;
use hot_list_aggregator::{init_tracing, Crawler, Registry, SnapshotStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config_default()?;
    let client = build_client(&cfg.user_agent)?;
    let registry = Registry::builtin(&cfg, client)?;
    let store = Arc::new(SnapshotStore::new(cfg.snapshot_path.clone()));
    let crawler = Crawler::new(registry, store);
    let target = crawler.store().path().display().to_string();

    let snapshot = crawler
        .run_and_publish()
        .await
        .with_context(|| format!("publishing to {target}"))?;

    for r in &snapshot.results {
        match &r.error_detail {
            None => println!("{:<20} ok      {:>3} records", r.source_name, r.records.len()),
            Some(e) => println!("{:<20} FAILED  {e}", r.source_name),
        }
    }
    println!(
        "{} sources, {} failed, written to {}",
        snapshot.results.len(),
        snapshot.failed_count(),
        target
    );
    Ok(())
}
