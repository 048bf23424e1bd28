//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged on top
//! of the configuration file and environment variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Polls Redis INFO and forwards operational gauges to statsd.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Redis host to poll.
    #[arg(value_name = "HOST")]
    pub host: Option<String>,

    /// Prefix for every metric name.
    #[arg(value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Redis port passed to redis-cli.
    #[arg(long, value_name = "PORT")]
    pub redis_port: Option<u16>,

    /// Path to the redis-cli binary.
    #[arg(long, value_name = "PATH")]
    pub redis_cli: Option<PathBuf>,

    /// Statsd host to send gauges to.
    #[arg(long, value_name = "HOST")]
    pub statsd_host: Option<String>,

    /// Statsd UDP port.
    #[arg(long, value_name = "PORT")]
    pub statsd_port: Option<u16>,

    /// Seconds between collection cycles.
    #[arg(long, value_name = "SECONDS")]
    pub interval_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        let mut redis = Dict::new();
        let mut statsd = Dict::new();

        if let Some(host) = &self.host {
            redis.insert("host".into(), Value::from(host.clone()));
        }
        if let Some(port) = self.redis_port {
            redis.insert("port".into(), Value::from(port));
        }
        if let Some(path) = &self.redis_cli {
            redis.insert("cli_path".into(), Value::from(path.display().to_string()));
        }

        if let Some(host) = &self.statsd_host {
            statsd.insert("host".into(), Value::from(host.clone()));
        }
        if let Some(port) = self.statsd_port {
            statsd.insert("port".into(), Value::from(port));
        }

        if let Some(namespace) = &self.namespace {
            dict.insert("namespace".into(), Value::from(namespace.clone()));
        }
        if let Some(secs) = self.interval_secs {
            dict.insert("interval_seconds".into(), Value::from(secs));
        }
        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        // Nested tables only when something was set, so they merge into the
        // lower layers instead of replacing them.
        if !redis.is_empty() {
            dict.insert("redis".into(), Value::from(redis));
        }
        if !statsd.is_empty() {
            dict.insert("statsd".into(), Value::from(statsd));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
