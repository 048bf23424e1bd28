//! redis-statsd - forwards Redis INFO gauges to statsd.

use anyhow::{Context, Result};
use clap::Parser;
use redis_statsd::{cli::Cli, collector::Collector, config::Config, emitter::StatsdEmitter};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            // Logging is not configured yet, fall back to a default subscriber.
            let _ = tracing_subscriber::fmt().try_init();
            error!("Failed to load configuration: {:#}", err);
            return Err(err);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("redis-statsd starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Namespace: {}", config.namespace);
    info!("Interval: {}s", config.interval_seconds);
    info!("Redis Host: {}", config.redis.host);
    match config.redis.port {
        Some(port) => info!("Redis Port: {}", port),
        None => info!("Redis Port: redis-cli default"),
    }
    info!("redis-cli Path: {}", config.redis.cli_path.display());
    info!("Statsd: {}:{}", config.statsd.host, config.statsd.port);
    info!("-------------------------------------------------------");

    // The socket lives for the whole run and is closed when `emitter` drops.
    let emitter = StatsdEmitter::from_config(&config.statsd)
        .await
        .context("failed to set up statsd emitter")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, finishing the current cycle...");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    });

    let collector = Collector::builder(&config).build();
    let cycles = collector.run(&emitter, shutdown_rx).await;

    drop(emitter);
    info!(cycles, "Statsd socket closed. Exiting.");
    Ok(())
}
