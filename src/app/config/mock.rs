use std::sync::{Arc, Mutex};

use super::data::Data;

/// In-memory configuration shared between clones.
#[derive(Debug, Clone)]
pub struct Mock {
    data: Arc<Mutex<Data>>,
}

impl Mock {
    pub fn new(data: Data) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// A copy of the current configuration.
    pub fn data(&self) -> Data {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Edits the configuration in place.
    pub fn update(&self, f: impl FnOnce(&mut Data)) {
        if let Ok(mut lock) = self.data.lock() {
            f(&mut lock);
        }
    }
}
