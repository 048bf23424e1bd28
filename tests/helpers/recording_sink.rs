#![allow(dead_code)]
use async_trait::async_trait;
use redis_statsd::core::{GaugeSink, MetricSample};
use redis_statsd::emitter::EmitError;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// A mock sink that records every wire line it is asked to send.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl GaugeSink for RecordingSink {
    async fn emit(&self, sample: &MetricSample) -> Result<(), EmitError> {
        self.lines.lock().unwrap().push(sample.to_wire());
        Ok(())
    }
}

/// A mock sink whose every send fails, counting the attempts.
#[derive(Clone, Debug, Default)]
pub struct FailingSink {
    pub attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl GaugeSink for FailingSink {
    async fn emit(&self, _sample: &MetricSample) -> Result<(), EmitError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(EmitError::Send {
            addr: SocketAddr::from(([127, 0, 0, 1], 8125)),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        })
    }
}
