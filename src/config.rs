//! Configuration management for redis-statsd
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! `REDIS_STATSD_` environment variables and command-line arguments, in that
//! order of precedence.

use crate::cli::Cli;
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Prefix applied to every metric name.
    pub namespace: String,
    /// Seconds to sleep between collection cycles.
    pub interval_seconds: u64,
    /// Where and how to query Redis.
    pub redis: RedisConfig,
    /// Where to send gauges.
    pub statsd: StatsdConfig,
}

/// Configuration for the Redis introspection command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RedisConfig {
    /// Host passed to `redis-cli -h`.
    pub host: String,
    /// Port passed to `redis-cli -p`. Left to redis-cli's default when unset.
    pub port: Option<u16>,
    /// Path to the `redis-cli` binary.
    pub cli_path: PathBuf,
}

/// Configuration for the statsd destination.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    /// Local address for the UDP socket. Defaults to an ephemeral port on
    /// the wildcard address of the destination's family.
    pub bind_address: Option<SocketAddr>,
}

impl Config {
    /// Loads the application configuration, layering sources in order of
    /// precedence: defaults, TOML file, environment variables, and CLI args.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = &cli.config {
            if !path.exists() {
                bail!("configuration file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: Config = figment
            // e.g. REDIS_STATSD_NAMESPACE=cache or REDIS_STATSD_STATSD__PORT=9125
            .merge(Env::prefixed("REDIS_STATSD_").split("__"))
            .merge(cli.clone())
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every cycle meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            bail!("namespace must not be empty");
        }
        if self.interval_seconds == 0 {
            bail!("interval_seconds must be at least 1");
        }
        if self.redis.host.trim().is_empty() {
            bail!("redis.host must not be empty");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            namespace: "redis".to_string(),
            interval_seconds: 1,
            redis: RedisConfig {
                host: "127.0.0.1".to_string(),
                port: None,
                cli_path: PathBuf::from("/usr/bin/redis-cli"),
            },
            statsd: StatsdConfig {
                host: "127.0.0.1".to_string(),
                port: 8125,
                bind_address: None,
            },
        }
    }
}
