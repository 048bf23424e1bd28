//! The polling loop: fetch, extract, emit, sleep, repeat.

use crate::{
    config::Config,
    core::{GaugeSink, InfoFetcher},
    extract::SampleExtractor,
    source::{MetricSource, RedisCli},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Outcome of a single collection cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Samples handed to the sink.
    pub emitted: usize,
    /// Sends the sink reported as failed. These are dropped, not retried.
    pub failed: usize,
}

/// Periodically samples one Redis host.
#[derive(Debug)]
pub struct Collector {
    host: String,
    source: MetricSource,
    extractor: SampleExtractor,
    interval: Duration,
}

impl Collector {
    /// Creates a new `CollectorBuilder` from the loaded configuration.
    pub fn builder(config: &Config) -> CollectorBuilder {
        CollectorBuilder::new(config)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one full cycle: both snapshots, then every sample in order.
    #[instrument(skip_all, fields(host = %self.host))]
    pub async fn run_cycle<S>(&self, sink: &S) -> CycleStats
    where
        S: GaugeSink + ?Sized,
    {
        let server = self.source.fetch_server_info(&self.host).await;
        let keyspace = self.source.fetch_keyspace_info(&self.host).await;

        let mut stats = CycleStats::default();
        for sample in self.extractor.extract_cycle(&server, &keyspace) {
            stats.emitted += 1;
            if sink.emit(&sample).await.is_err() {
                stats.failed += 1;
            }
        }

        debug!(emitted = stats.emitted, failed = stats.failed, "Cycle complete");
        stats
    }

    /// Loops until `shutdown_rx` reads `true`, returning the number of
    /// cycles run.
    ///
    /// The flag is polled once per iteration, after the sleep. A shutdown
    /// requested mid-cycle or mid-sleep takes effect at that point, and no
    /// further cycle is started.
    pub async fn run<S>(&self, sink: &S, shutdown_rx: watch::Receiver<bool>) -> u64
    where
        S: GaugeSink + ?Sized,
    {
        info!(
            host = %self.host,
            namespace = self.extractor.namespace(),
            interval_secs = self.interval.as_secs(),
            "Collector started"
        );

        let mut cycles = 0u64;
        loop {
            self.run_cycle(sink).await;
            cycles += 1;

            tokio::time::sleep(self.interval).await;

            if *shutdown_rx.borrow() {
                info!(cycles, "Shutdown requested, stopping collector.");
                break;
            }
        }
        cycles
    }
}

/// Builder for the collector.
///
/// Separates construction from running and lets tests swap the `redis-cli`
/// collaborator for canned output.
pub struct CollectorBuilder {
    host: String,
    namespace: String,
    interval: Duration,
    default_fetcher: RedisCli,
    fetcher_override: Option<Arc<dyn InfoFetcher>>,
}

impl CollectorBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            host: config.redis.host.clone(),
            namespace: config.namespace.clone(),
            interval: config.interval(),
            default_fetcher: RedisCli::from_config(&config.redis),
            fetcher_override: None,
        }
    }

    /// Overrides the introspection command for testing.
    pub fn fetcher_override(mut self, fetcher: Arc<dyn InfoFetcher>) -> Self {
        self.fetcher_override = Some(fetcher);
        self
    }

    pub fn build(self) -> Collector {
        let fetcher: Arc<dyn InfoFetcher> = match self.fetcher_override {
            Some(fetcher) => fetcher,
            None => Arc::new(self.default_fetcher),
        };
        Collector {
            host: self.host,
            source: MetricSource::new(fetcher),
            extractor: SampleExtractor::new(self.namespace),
            interval: self.interval,
        }
    }
}
