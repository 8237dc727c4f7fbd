use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{MY_SANDWICHES_KEY, update_owned};
use crate::ArcStr;

/// In-memory storage shared between clones.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    entries: Arc<Mutex<HashMap<ArcStr, ArcStr>>>,
}

impl Mock {
    pub fn get(&self, key: &str) -> Option<ArcStr> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: ArcStr, value: ArcStr) {
        if let Ok(mut lock) = self.entries.lock() {
            lock.insert(key, value);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut lock) = self.entries.lock() {
            lock.remove(key);
        }
    }

    pub fn set_owned(&self, id: i64, owned: bool) -> anyhow::Result<()> {
        let Ok(mut lock) = self.entries.lock() else {
            return Ok(());
        };
        let raw = lock.get(MY_SANDWICHES_KEY).map(|raw| &**raw);
        if let Some(updated) = update_owned(raw, id, owned)? {
            lock.insert(ArcStr::from(MY_SANDWICHES_KEY), ArcStr::from(updated));
        }
        Ok(())
    }
}
