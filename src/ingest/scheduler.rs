// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ingest::Crawler;

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A cycle was started; the handle resolves when it has been published.
    Started(JoinHandle<()>),
    /// The previous cycle was still running, so this tick was dropped.
    Skipped,
}

impl TickOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, TickOutcome::Skipped)
    }
}

/// Runs the crawler once at startup and then every `period`, never more than one
/// cycle at a time.
pub struct Scheduler {
    crawler: Arc<Crawler>,
    period: Duration,
    // held for the whole duration of a cycle
    running: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(crawler: Arc<Crawler>, period: Duration) -> Self {
        Self {
            crawler,
            // tokio's interval rejects a zero period
            period: period.max(Duration::from_millis(1)),
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// Start a cycle unless one is already in flight.
    pub fn tick(&self) -> TickOutcome {
        let guard = match self.running.clone().try_lock_owned() {
            Ok(g) => g,
            Err(_) => {
                counter!("crawl_ticks_skipped_total").increment(1);
                tracing::warn!(target: "ingest", "previous cycle still running; tick skipped");
                return TickOutcome::Skipped;
            }
        };
        let crawler = self.crawler.clone();
        TickOutcome::Started(tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = crawler.run_and_publish().await {
                tracing::error!(
                    target: "ingest",
                    error = %e,
                    "snapshot publish failed; previous snapshot stays visible"
                );
            }
        }))
    }

    /// Spawn the timer loop. The first tick fires immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(
                target: "ingest",
                period_secs = self.period.as_secs(),
                sources = self.crawler.registry().len(),
                "scheduler started"
            );
            loop {
                ticker.tick().await;
                let _ = self.tick();
            }
        })
    }
}
