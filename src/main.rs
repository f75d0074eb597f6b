//! Hot-list service binary entrypoint.
//! Loads config, starts the crawl scheduler in the background, and serves the
//! read-only snapshot API through Shuttle/Axum.

use std::sync::Arc;

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing::info;

use hot_list_aggregator::api::{self, AppState};
use hot_list_aggregator::ingest::config::load_config_default;
use hot_list_aggregator::ingest::providers::build_client;
use hot_list_aggregator::metrics::Metrics;
use hot_list_aggregator::{init_tracing, Crawler, Registry, Scheduler, SnapshotStore};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config_default().context("loading crawler config")?;
    let client = build_client(&cfg.user_agent).context("building http client")?;
    let registry = Registry::builtin(&cfg, client).context("building source registry")?;
    let store = Arc::new(SnapshotStore::new(cfg.snapshot_path.clone()));

    let crawler = Arc::new(Crawler::new(registry, store.clone()));
    let scheduler = Scheduler::new(crawler.clone(), cfg.interval());
    info!(
        sources = crawler.registry().len(),
        interval_secs = scheduler.period().as_secs(),
        snapshot = %crawler.store().path().display(),
        "starting hot-list crawler"
    );
    scheduler.spawn();

    let metrics = Metrics::init()?;
    let router = api::router(AppState { store }).merge(metrics.router());

    Ok(router.into())
}
