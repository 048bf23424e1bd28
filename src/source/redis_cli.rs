//! Fetches INFO output by shelling out to `redis-cli`.

use super::SourceError;
use crate::config::RedisConfig;
use crate::core::{InfoFetcher, InfoSection};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{instrument, trace};

/// Runs `redis-cli -h <host> [-p <port>] info [section]` and captures stdout.
///
/// The exit status is not inspected; whatever the command printed is handed
/// to the parser. There is no timeout, so a hung `redis-cli` stalls the
/// collector until it returns.
#[derive(Debug, Clone)]
pub struct RedisCli {
    cli_path: PathBuf,
    port: Option<u16>,
}

impl RedisCli {
    pub fn new(cli_path: impl Into<PathBuf>, port: Option<u16>) -> Self {
        Self {
            cli_path: cli_path.into(),
            port,
        }
    }

    pub fn from_config(config: &RedisConfig) -> Self {
        Self::new(config.cli_path.clone(), config.port)
    }

    fn build_command(&self, host: &str, section: InfoSection) -> Command {
        let mut cmd = Command::new(&self.cli_path);
        cmd.arg("-h").arg(host);
        if let Some(port) = self.port {
            cmd.arg("-p").arg(port.to_string());
        }
        cmd.arg("info").args(section.cli_args());

        cmd.kill_on_drop(true);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        cmd
    }

    fn describe(&self, section: InfoSection) -> String {
        format!("{} info {}", self.cli_path.display(), section)
    }
}

#[async_trait]
impl InfoFetcher for RedisCli {
    #[instrument(skip(self))]
    async fn fetch(&self, host: &str, section: InfoSection) -> Result<String, SourceError> {
        let output = self
            .build_command(host, section)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                command: self.describe(section),
                source,
            })?;

        trace!(status = %output.status, bytes = output.stdout.len(), "redis-cli finished");

        if output.stdout.is_empty() {
            return Err(SourceError::EmptyOutput(self.describe(section)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
