use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    ArcSlice, ArcStr,
    api::{OptionKind, OptionsApi, SandwichOption, deadline},
    log::Log,
};

#[cfg(test)]
mod tests;

const SCOPE: &str = "app.options";

/// Latest list and error published for one kind.
#[derive(Debug)]
struct Slot {
    list: watch::Sender<ArcSlice<SandwichOption>>,
    error: watch::Sender<Option<ArcStr>>,
}

impl Slot {
    fn new() -> Self {
        Self {
            list: watch::Sender::new(ArcSlice::from([])),
            error: watch::Sender::new(None),
        }
    }
}

/// Session-wide cache of the five option lists.
///
/// Each kind owns a list channel and an error channel that always hold the
/// latest value. Subscribers see that value right away and every later one.
/// Loads are not deduplicated: concurrent loads of a kind each hit the
/// backend and the last one to finish wins.
///
/// # Examples
/// ```ignore
/// let facade = OptionsFacade::new(api, log, Duration::from_secs(5));
/// let mut breads = facade.list(OptionKind::Breads);
/// facade.load_all();
/// breads.changed().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OptionsFacade {
    api: OptionsApi,
    log: Log,
    timeout: Duration,
    slots: Arc<BTreeMap<OptionKind, Slot>>,
}

impl OptionsFacade {
    /// Creates the facade with an empty list and no error for every kind.
    pub fn new(api: OptionsApi, log: Log, timeout: Duration) -> Self {
        let slots = OptionKind::ALL
            .into_iter()
            .map(|kind| (kind, Slot::new()))
            .collect();
        Self {
            api,
            log,
            timeout,
            slots: Arc::new(slots),
        }
    }

    fn slot(&self, kind: OptionKind) -> &Slot {
        // Every kind is inserted by `new`
        &self.slots[&kind]
    }

    /// Subscribes to the list of `kind`.
    pub fn list(&self, kind: OptionKind) -> watch::Receiver<ArcSlice<SandwichOption>> {
        self.slot(kind).list.subscribe()
    }

    /// Subscribes to the load error of `kind`.
    pub fn error(&self, kind: OptionKind) -> watch::Receiver<Option<ArcStr>> {
        self.slot(kind).error.subscribe()
    }

    /// Current list and error of `kind`.
    pub fn snapshot(&self, kind: OptionKind) -> (ArcSlice<SandwichOption>, Option<ArcStr>) {
        let slot = self.slot(kind);
        (slot.list.borrow().clone(), slot.error.borrow().clone())
    }

    /// Fetches `kind` in the background.
    ///
    /// The error is cleared before this returns. On success the error is
    /// cleared again and the list published. On failure or timeout the
    /// error becomes `Failed to load {kind}` and the list is emptied, so
    /// subscribers always receive a list. Concurrent loads of one kind are
    /// not merged: each sends a request and the last to finish wins.
    /// Dropping the handle does not cancel the load.
    pub fn load(&self, kind: OptionKind) -> JoinHandle<()> {
        self.slot(kind).error.send_replace(None);

        let facade = self.clone();
        tokio::spawn(async move {
            let res = deadline(facade.timeout, facade.api.list(kind)).await;
            let slot = facade.slot(kind);
            match res {
                Ok(options) => {
                    facade
                        .log
                        .info(SCOPE, format!("Loaded {} {kind}", options.len()));
                    slot.error.send_replace(None);
                    slot.list.send_replace(ArcSlice::from(options));
                }
                Err(err) => {
                    facade
                        .log
                        .warn(SCOPE, format!("Loading {kind} failed: {err}"));
                    slot.error
                        .send_replace(Some(ArcStr::from(format!("Failed to load {kind}"))));
                    slot.list.send_replace(ArcSlice::from([]));
                }
            }
        })
    }

    /// Starts one load per kind.
    pub fn load_all(&self) -> Vec<JoinHandle<()>> {
        OptionKind::ALL
            .into_iter()
            .map(|kind| self.load(kind))
            .collect()
    }

    /// Same as [`OptionsFacade::load`].
    pub fn retry(&self, kind: OptionKind) -> JoinHandle<()> {
        self.load(kind)
    }
}
