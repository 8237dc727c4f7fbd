use std::sync::{Arc, Mutex};

use super::data::LogMessage;

/// Mock implementation of the Log actor.
///
/// Keeps every message in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl Mock {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&self, message: LogMessage) {
        if let Ok(mut lock) = self.messages.lock() {
            lock.push(message);
        }
    }

    /// Every message logged so far, oldest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages
            .lock()
            .map(|lock| lock.clone())
            .unwrap_or_default()
    }
}
