#![allow(dead_code)]
use redis_statsd::config::Config;
use redis_statsd::core::InfoSection;
use redis_statsd::source::test_utils::FakeFetcher;

pub const SERVER_INFO: &str = "# Server\r
redis_version:7.2.4\r
uptime_in_seconds:3600\r
\r
# Clients\r
connected_clients:5\r
\r
# Memory\r
used_memory:1000000\r
used_memory_rss:1500000\r
mem_fragmentation_ratio:1.50\r
\r
# Persistence\r
changes_since_last_save:12\r
\r
# Stats\r
total_commands_processed:4242\r
instantaneous_ops_per_sec:17\r
expired_keys:9\r
evicted_keys:0\r
keyspace_hits:1\r
keyspace_misses:2\r
\r
# Replication\r
role:master\r
connected_slaves:1\r
";

pub const KEYSPACE_INFO: &str = "# Keyspace\r
db0:keys=120,expires=30,avg_ttl=500\r
db3:keys=4,expires=0,avg_ttl=0\r
";

/// Every datagram the fixtures above should produce, in order.
pub fn expected_lines(namespace: &str) -> Vec<String> {
    [
        "uptime_in_seconds:3600",
        "connected_clients:5",
        "used_memory:1000000",
        "used_memory_rss:1500000",
        "changes_since_last_save:12",
        "evicted_keys:0",
        "expired_keys:9",
        "total_commands_processed:4242",
        "instantaneous_ops_per_sec:17",
        "connected_slaves:1",
        "miss_percentage:66.66666666666667",
        "mem_fragmentation_ratio:1.50",
        "db0.keys:120",
        "db0.expires:30",
        "db0.agv_ttl:500",
        "db3.keys:4",
        "db3.expires:0",
        "db3.agv_ttl:0",
    ]
    .iter()
    .map(|line| format!("{}.{}|g\n", namespace, line))
    .collect()
}

/// A fetcher serving both fixtures.
pub fn canned_fetcher() -> FakeFetcher {
    let fetcher = FakeFetcher::new();
    fetcher.set_response(InfoSection::Server, SERVER_INFO);
    fetcher.set_response(InfoSection::Keyspace, KEYSPACE_INFO);
    fetcher
}

pub fn test_config(namespace: &str, interval_seconds: u64) -> Config {
    Config {
        namespace: namespace.to_string(),
        interval_seconds,
        ..Config::default()
    }
}
