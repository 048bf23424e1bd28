use crate::core::{InfoFetcher, InfoSection};
use crate::source::SourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fake `redis-cli` for testing.
///
/// Serves the same canned text for a section on every call until it is
/// replaced. Sections with no canned text fail like a missing binary would.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    responses: Arc<Mutex<HashMap<InfoSection, String>>>,
    calls: Arc<Mutex<Vec<(String, InfoSection)>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text returned for `section`.
    pub fn set_response(&self, section: InfoSection, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(section, text.to_string());
    }

    /// Every `(host, section)` pair fetched so far, in call order.
    pub fn calls(&self) -> Vec<(String, InfoSection)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, section: InfoSection) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == section)
            .count()
    }
}

#[async_trait]
impl InfoFetcher for FakeFetcher {
    async fn fetch(&self, host: &str, section: InfoSection) -> Result<String, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), section));

        match self.responses.lock().unwrap().get(&section) {
            Some(text) => Ok(text.clone()),
            None => Err(SourceError::Spawn {
                command: format!("fake redis-cli info {}", section),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no canned response"),
            }),
        }
    }
}
