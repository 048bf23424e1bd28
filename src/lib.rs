//! redis-statsd polls a Redis server's INFO output on a fixed interval and
//! forwards a fixed set of operational gauges to a statsd collector over UDP.

pub mod cli;
pub mod collector;
pub mod config;
pub mod core;
pub mod emitter;
pub mod extract;
pub mod source;

// Re-export core types for convenience
pub use crate::core::*;
