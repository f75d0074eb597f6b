// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod ingest;
pub mod metrics;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::ingest::registry::Registry;
pub use crate::ingest::scheduler::Scheduler;
pub use crate::ingest::types::{Record, Snapshot, Source, SourceError, SourceResult};
pub use crate::ingest::{run_cycle, Crawler};
pub use crate::store::{SnapshotReadError, SnapshotStore, SnapshotWriteError};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the tracing subscriber: `RUST_LOG` filter (default `info`), compact
/// lines, or JSON when `LOG_FORMAT=json`. A no-op if a subscriber is already set
/// (Shuttle installs its own).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
