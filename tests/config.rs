use redis_statsd::cli::Cli;
use redis_statsd::config::Config;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_defaults_without_file() {
    let config = Config::load(&Cli::default()).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.namespace, "redis");
    assert_eq!(config.interval_seconds, 1);
    assert_eq!(config.redis.host, "127.0.0.1");
    assert_eq!(config.redis.cli_path, PathBuf::from("/usr/bin/redis-cli"));
    assert_eq!(config.statsd.host, "127.0.0.1");
    assert_eq!(config.statsd.port, 8125);
    assert!(config.statsd.bind_address.is_none());
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let file = write_config(
        r#"
        log_level = "debug"
        namespace = "prod.cache"
        interval_seconds = 10
        [redis]
        host = "10.0.0.7"
        port = 6380
        cli_path = "/opt/redis/bin/redis-cli"
        [statsd]
        host = "10.0.0.1"
        port = 9125
        bind_address = "0.0.0.0:0"
    "#,
    );
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.namespace, "prod.cache");
    assert_eq!(config.interval_seconds, 10);
    assert_eq!(config.redis.host, "10.0.0.7");
    assert_eq!(config.redis.port, Some(6380));
    assert_eq!(config.redis.cli_path, PathBuf::from("/opt/redis/bin/redis-cli"));
    assert_eq!(config.statsd.host, "10.0.0.1");
    assert_eq!(config.statsd.port, 9125);
    assert_eq!(config.statsd.bind_address, Some("0.0.0.0:0".parse().unwrap()));
}

#[test]
#[serial]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
        [statsd]
        port = 9999
    "#,
    );
    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.statsd.port, 9999);
    assert_eq!(config.statsd.host, "127.0.0.1");
    assert_eq!(config.namespace, "redis");
}

#[test]
#[serial]
fn test_cli_overrides_file() {
    let file = write_config(
        r#"
        namespace = "from_file"
        [redis]
        host = "file-host"
        cli_path = "/from/file/redis-cli"
    "#,
    );
    let cli = Cli {
        host: Some("cli-host".to_string()),
        namespace: Some("from_cli".to_string()),
        config: Some(file.path().to_path_buf()),
        statsd_port: Some(8126),
        interval_secs: Some(5),
        ..Default::default()
    };

    let config = Config::load(&cli).unwrap();

    assert_eq!(config.namespace, "from_cli");
    assert_eq!(config.redis.host, "cli-host");
    // Untouched by the CLI, so the file value survives the merge.
    assert_eq!(config.redis.cli_path, PathBuf::from("/from/file/redis-cli"));
    assert_eq!(config.statsd.port, 8126);
    assert_eq!(config.interval_seconds, 5);
}

#[test]
#[serial]
fn test_env_overrides_file_but_not_cli() {
    let file = write_config(
        r#"
        namespace = "from_file"
        interval_seconds = 30
    "#,
    );
    std::env::set_var("REDIS_STATSD_NAMESPACE", "from_env");
    std::env::set_var("REDIS_STATSD_INTERVAL_SECONDS", "15");
    std::env::set_var("REDIS_STATSD_STATSD__PORT", "7777");

    let cli = Cli {
        config: Some(file.path().to_path_buf()),
        interval_secs: Some(2),
        ..Default::default()
    };
    let result = Config::load(&cli);

    std::env::remove_var("REDIS_STATSD_NAMESPACE");
    std::env::remove_var("REDIS_STATSD_INTERVAL_SECONDS");
    std::env::remove_var("REDIS_STATSD_STATSD__PORT");

    let config = result.unwrap();
    assert_eq!(config.namespace, "from_env");
    assert_eq!(config.statsd.port, 7777);
    assert_eq!(config.interval_seconds, 2);
}

#[test]
#[serial]
fn test_missing_config_file_is_error() {
    let cli = Cli {
        config: Some(PathBuf::from("/nonexistent/redis-statsd.toml")),
        ..Default::default()
    };
    assert!(Config::load(&cli).is_err());
}

#[test]
#[serial]
fn test_rejects_invalid_values() {
    let cli = Cli {
        namespace: Some("  ".to_string()),
        ..Default::default()
    };
    assert!(Config::load(&cli).is_err());

    let cli = Cli {
        interval_secs: Some(0),
        ..Default::default()
    };
    assert!(Config::load(&cli).is_err());
}
