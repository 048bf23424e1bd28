//! Core domain types and service traits for redis-statsd
//!
//! This module defines the data that flows through one collection cycle and
//! the trait contracts for the two collaborators at its edges: the Redis
//! introspection command and the statsd transport.

use crate::emitter::EmitError;
use crate::source::SourceError;
use async_trait::async_trait;
use std::fmt;

/// The two introspection sections pulled on every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoSection {
    /// The default `INFO` output: flat `key:value` pairs.
    Server,
    /// `INFO keyspace`: one `dbN:keys=..,expires=..,avg_ttl=..` line per database.
    Keyspace,
}

impl InfoSection {
    /// Extra arguments appended after `info` on the command line.
    pub fn cli_args(&self) -> &'static [&'static str] {
        match self {
            InfoSection::Server => &[],
            InfoSection::Keyspace => &["keyspace"],
        }
    }
}

impl fmt::Display for InfoSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoSection::Server => write!(f, "server"),
            InfoSection::Keyspace => write!(f, "keyspace"),
        }
    }
}

/// The complete text output of one introspection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSnapshot {
    pub section: InfoSection,
    pub lines: Vec<String>,
}

impl RawSnapshot {
    /// Splits raw command output into lines, dropping the `\r` that
    /// `redis-cli` leaves behind on CRLF-terminated output.
    pub fn from_text(section: InfoSection, text: &str) -> Self {
        Self {
            section,
            lines: text
                .lines()
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect(),
        }
    }

    /// A snapshot with no lines, used when collection fails.
    pub fn empty(section: InfoSection) -> Self {
        Self {
            section,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The value carried by a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Int(i64),
    Float(f64),
    /// Source text passed through untouched. Checked for being numeric only
    /// when the wire line is rendered.
    Raw(Option<String>),
}

impl SampleValue {
    /// Renders the value for the statsd wire format. Always numeric.
    pub fn render(&self) -> String {
        match self {
            SampleValue::Int(v) => v.to_string(),
            SampleValue::Float(v) => render_float(*v),
            SampleValue::Raw(raw) => match raw.as_deref().map(str::trim) {
                Some(text) if text.parse::<f64>().is_ok_and(f64::is_finite) => text.to_string(),
                _ => "0".to_string(),
            },
        }
    }
}

/// Shortest round-trip formatting, but whole numbers keep a `.0` so a
/// percentage of 50 reads `50.0` on the wire.
fn render_float(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single named gauge produced by one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Fully namespaced, dot-separated metric name.
    pub name: String,
    pub value: SampleValue,
}

impl MetricSample {
    pub fn new(name: impl Into<String>, value: SampleValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The statsd gauge line for this sample, e.g. `redis.used_memory:1024|g\n`.
    pub fn to_wire(&self) -> String {
        format!("{}:{}|g\n", self.name, self.value)
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Runs the Redis introspection command against a host.
#[async_trait]
pub trait InfoFetcher: Send + Sync {
    /// Returns the raw standard output of `INFO` for the given section.
    ///
    /// # Returns
    /// * `Ok(String)` with whatever the command printed, possibly empty
    /// * `Err` if the command could not be run at all
    async fn fetch(&self, host: &str, section: InfoSection) -> Result<String, SourceError>;
}

/// Delivers gauge samples to a metrics collector.
#[async_trait]
pub trait GaugeSink: Send + Sync {
    /// Sends one sample. Delivery is never confirmed; an `Err` only means the
    /// local send call failed.
    async fn emit(&self, sample: &MetricSample) -> Result<(), EmitError>;
}
