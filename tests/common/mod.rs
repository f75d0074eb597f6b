// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hot_list_aggregator::ingest::registry::RegisteredSource;
use hot_list_aggregator::{Record, Source, SourceError};

#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Records(usize),
    Fail,
    Panic,
}

/// Scripted source: sleeps for `delay`, then does what `behavior` says.
/// Tracks how many calls are in flight to observe overlap.
pub struct MockSource {
    pub delay: Duration,
    pub behavior: Behavior,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockSource {
    pub fn new(delay: Duration, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            delay,
            behavior,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    async fn fetch(&self, _timeout: Duration) -> Result<Vec<Record>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Records(n) => Ok((0..n)
                .map(|i| Record::new(format!("item {i}"), format!("https://example.com/{i}")))
                .collect()),
            Behavior::Fail => Err(SourceError::Fetch("connection refused".into())),
            Behavior::Panic => panic!("plugin bug"),
        }
    }
}

pub fn entry(name: &str, timeout: Duration, source: Arc<MockSource>) -> RegisteredSource {
    RegisteredSource::new(name, timeout, source)
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
