use std::collections::BTreeSet;

use crate::{
    ArcStr,
    api::{ApiError, Sandwich, SandwichApi},
    log::Log,
    storage::Storage,
};

const SCOPE: &str = "app.views.list";

/// All sandwiches, with delete for the ones created here.
#[derive(Debug, Clone)]
pub struct SandwichList {
    api: SandwichApi,
    storage: Storage,
    log: Log,
    pub sandwiches: Vec<Sandwich>,
    pub loading: bool,
    pub error: Option<ArcStr>,
    pub cursor: usize,
    owned: BTreeSet<i64>,
}

impl SandwichList {
    /// Creates an empty list. Nothing is loaded until [`SandwichList::load`].
    pub fn new(api: SandwichApi, storage: Storage, log: Log) -> Self {
        Self {
            api,
            storage,
            log,
            sandwiches: Vec::new(),
            loading: false,
            error: None,
            cursor: 0,
            owned: BTreeSet::new(),
        }
    }

    /// Fetches the list. On failure the list is emptied and the error shown.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        self.owned = self.storage.owned_sandwiches().await.into_iter().collect();

        match self.api.list().await {
            Ok(sandwiches) => self.sandwiches = sandwiches,
            Err(err) => {
                self.log.warn(SCOPE, format!("Loading sandwiches failed: {err}"));
                self.sandwiches.clear();
                self.error = Some(format!("Failed to load sandwiches: {err}").into());
            }
        }
        self.cursor = self.cursor.min(self.sandwiches.len().saturating_sub(1));
        self.loading = false;
    }

    /// Deletes sandwich `id` and drops it from the list.
    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        if let Err(err) = self.api.delete(id).await {
            self.log.warn(SCOPE, format!("Deleting sandwich {id} failed: {err}"));
            self.error = Some(format!("Failed to delete sandwich: {err}").into());
            return Err(err);
        }

        self.sandwiches.retain(|s| s.id != id);
        self.owned.remove(&id);
        let _ = self
            .log
            .warn_on_error(SCOPE, self.storage.forget_sandwich(id).await);
        self.cursor = self.cursor.min(self.sandwiches.len().saturating_sub(1));
        Ok(())
    }

    /// Whether `id` was created from this machine.
    pub fn owned(&self, id: i64) -> bool {
        self.owned.contains(&id)
    }

    /// The highlighted sandwich.
    pub fn selected(&self) -> Option<&Sandwich> {
        self.sandwiches.get(self.cursor)
    }

    /// Moves the highlight down, stopping at the last row.
    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.sandwiches.len() {
            self.cursor += 1;
        }
    }

    /// Moves the highlight up, stopping at the first row.
    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}
