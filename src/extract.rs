//! Turns raw INFO snapshots into namespaced gauge samples.
//!
//! Extraction is total: absent keys, non-numeric values and lines that do
//! not look like `key:value` all degrade to defaults instead of failing.

use crate::core::{InfoSection, MetricSample, RawSnapshot, SampleValue};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Server fields forwarded as integer gauges, in emission order.
pub const GAUGE_KEYS: [&str; 10] = [
    "uptime_in_seconds",
    "connected_clients",
    "used_memory",
    "used_memory_rss",
    "changes_since_last_save",
    "evicted_keys",
    "expired_keys",
    "total_commands_processed",
    "instantaneous_ops_per_sec",
    "connected_slaves",
];

static DB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(db\d+):keys=(\d+)(?:,expires=(\d+))?(?:,avg_ttl=(\d+))?").unwrap()
});

/// Field name to raw value, parsed from a server snapshot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InfoMap {
    fields: HashMap<String, String>,
}

impl InfoMap {
    /// Splits each line on its first `:`. Lines without a colon are skipped;
    /// a repeated key keeps its last value.
    pub fn parse(snapshot: &RawSnapshot) -> Self {
        let fields = snapshot
            .lines
            .iter()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { fields }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Integer value of `key`, or 0 when absent or not numeric. Decimal
    /// values are truncated toward zero.
    pub fn int_or_zero(&self, key: &str) -> i64 {
        let Some(value) = self.raw(key).map(str::trim) else {
            return 0;
        };
        value.parse::<i64>().unwrap_or_else(|_| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
                .unwrap_or(0)
        })
    }
}

/// Per-database summary from one keyspace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceEntry {
    pub db: String,
    pub keys: i64,
    pub expires: Option<i64>,
    pub avg_ttl: Option<i64>,
}

impl KeyspaceEntry {
    /// Parses `db0:keys=120,expires=30,avg_ttl=500`. `expires` and `avg_ttl`
    /// are optional since older and newer servers report different tails.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = DB_LINE.captures(line)?;
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i64>().ok());
        Some(Self {
            db: caps[1].to_string(),
            keys: number(2)?,
            expires: number(3),
            avg_ttl: number(4),
        })
    }
}

/// Builds the samples for one namespace.
#[derive(Debug, Clone)]
pub struct SampleExtractor {
    namespace: String,
}

impl SampleExtractor {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self, suffix: &str) -> String {
        format!("{}.{}", self.namespace, suffix)
    }

    /// Dispatches on the snapshot's section.
    pub fn extract(&self, snapshot: &RawSnapshot) -> Vec<MetricSample> {
        match snapshot.section {
            InfoSection::Server => self.extract_server(snapshot),
            InfoSection::Keyspace => self.extract_keyspace(snapshot),
        }
    }

    /// Fixed gauges, then miss percentage, fragmentation ratio and, for
    /// replicas, the master link state.
    pub fn extract_server(&self, snapshot: &RawSnapshot) -> Vec<MetricSample> {
        let info = InfoMap::parse(snapshot);
        let mut samples = Vec::with_capacity(GAUGE_KEYS.len() + 3);

        for key in GAUGE_KEYS {
            samples.push(MetricSample::new(
                self.name(key),
                SampleValue::Int(info.int_or_zero(key)),
            ));
        }

        samples.push(MetricSample::new(
            self.name("miss_percentage"),
            SampleValue::Float(miss_percentage(&info)),
        ));

        samples.push(MetricSample::new(
            self.name("mem_fragmentation_ratio"),
            SampleValue::Raw(info.raw("mem_fragmentation_ratio").map(str::to_string)),
        ));

        if info.raw("role").map(str::trim) == Some("slave") {
            let up = info.raw("master_link_status").map(str::trim) == Some("up");
            samples.push(MetricSample::new(
                self.name("master_link_up"),
                SampleValue::Int(i64::from(up)),
            ));
        }

        samples
    }

    /// Up to three samples per database line, in snapshot order.
    pub fn extract_keyspace(&self, snapshot: &RawSnapshot) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        for entry in snapshot.lines.iter().filter_map(|l| KeyspaceEntry::parse(l)) {
            samples.push(MetricSample::new(
                self.name(&format!("{}.keys", entry.db)),
                SampleValue::Int(entry.keys),
            ));
            if let Some(expires) = entry.expires {
                samples.push(MetricSample::new(
                    self.name(&format!("{}.expires", entry.db)),
                    SampleValue::Int(expires),
                ));
            }
            if let Some(avg_ttl) = entry.avg_ttl {
                // `agv_ttl` is the name dashboards already key off.
                samples.push(MetricSample::new(
                    self.name(&format!("{}.agv_ttl", entry.db)),
                    SampleValue::Int(avg_ttl),
                ));
            }
        }
        samples
    }

    /// All samples for one cycle: server first, then keyspace.
    pub fn extract_cycle(&self, server: &RawSnapshot, keyspace: &RawSnapshot) -> Vec<MetricSample> {
        let mut samples = self.extract(server);
        samples.extend(self.extract(keyspace));
        samples
    }
}

/// Convenience wrapper over [`SampleExtractor::extract`].
pub fn extract(snapshot: &RawSnapshot, namespace: &str) -> Vec<MetricSample> {
    SampleExtractor::new(namespace).extract(snapshot)
}

/// Percentage of keyspace lookups that missed; 0.0 when there were none.
pub fn miss_percentage(info: &InfoMap) -> f64 {
    let hits = info.int_or_zero("keyspace_hits");
    let misses = info.int_or_zero("keyspace_misses");
    let total = hits.saturating_add(misses);
    if total > 0 {
        100.0 * misses as f64 / total as f64
    } else {
        0.0
    }
}
