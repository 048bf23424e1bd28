pub mod redis_cli;
#[cfg(feature = "test-utils")]
pub mod test_utils;

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub use crate::core::InfoFetcher;
use crate::core::{InfoSection, RawSnapshot};
pub use redis_cli::RedisCli;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} produced no output")]
    EmptyOutput(String),
}

/// Pulls server and keyspace snapshots for one host.
///
/// Collection never fails a cycle: any error from the underlying fetcher is
/// logged and turned into an empty snapshot, which the extractor maps to
/// zero-valued gauges.
#[derive(Clone)]
pub struct MetricSource {
    fetcher: Arc<dyn InfoFetcher>,
}

impl MetricSource {
    pub fn new(fetcher: Arc<dyn InfoFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_server_info(&self, host: &str) -> RawSnapshot {
        self.fetch(host, InfoSection::Server).await
    }

    pub async fn fetch_keyspace_info(&self, host: &str) -> RawSnapshot {
        self.fetch(host, InfoSection::Keyspace).await
    }

    async fn fetch(&self, host: &str, section: InfoSection) -> RawSnapshot {
        match self.fetcher.fetch(host, section).await {
            Ok(text) => {
                let snapshot = RawSnapshot::from_text(section, &text);
                debug!(host, %section, lines = snapshot.lines.len(), "Fetched snapshot");
                snapshot
            }
            Err(e) => {
                warn!(host, %section, error = %e, "Collection failed, using empty snapshot");
                RawSnapshot::empty(section)
            }
        }
    }
}

impl std::fmt::Debug for MetricSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricSource").finish_non_exhaustive()
    }
}
