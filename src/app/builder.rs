use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use tokio::sync::watch;

use crate::{
    ArcSlice, ArcStr,
    api::{ApiError, OptionKind, Sandwich, SandwichApi, SandwichOption, SandwichPayload, deadline},
    app::options::OptionsFacade,
    log::Log,
    storage::Storage,
};

mod data;
mod parse;

pub use data::{BuilderState, Mode, Selection, Step, SummaryRow};
pub use parse::{ParsedDescription, parse_description};

const SCOPE: &str = "app.builder";

/// Delay between a successful save and the return to the sandwich list.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// A save ready to be sent, detached from the form so it can run in its
/// own task while the form keeps rendering.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    mode: Mode,
    payload: SandwichPayload,
    api: SandwichApi,
    timeout: Duration,
}

pub type SubmitResult = Result<Option<i64>, ApiError>;

impl SubmitRequest {
    /// Sends the create or update, aborting after the submit timeout.
    pub async fn run(self) -> SubmitResult {
        let fut = async {
            match self.mode {
                Mode::Create => self.api.create(&self.payload).await,
                Mode::Edit(id) => self.api.update(id, &self.payload).await,
            }
        };
        deadline(self.timeout, fut).await
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was sent: a save is in flight or the form is incomplete
    Ignored,
    /// Saved. The caller navigates back to the list after `redirect_after`
    Saved {
        id: Option<i64>,
        redirect_after: Duration,
    },
    /// The backend rejected some fields, their errors are on the form
    Invalid,
    /// Any other failure, reported in the error banner
    Failed,
}

/// The multi-step sandwich builder.
///
/// Mirrors the facade lists into its own [`BuilderState`] and keeps the
/// selection, the current step and the banners. Drive it with the toggle and
/// navigation methods, call [`BuilderForm::sync_from_facade`] whenever the
/// facade may have published, and submit with [`BuilderForm::submit`] or the
/// split [`BuilderForm::begin_submit`] / [`BuilderForm::finish_submit`].
#[derive(Debug, Clone)]
pub struct BuilderForm {
    facade: OptionsFacade,
    sandwiches: SandwichApi,
    storage: Storage,
    log: Log,
    submit_timeout: Duration,
    lists_rx: BTreeMap<OptionKind, watch::Receiver<ArcSlice<SandwichOption>>>,
    errors_rx: BTreeMap<OptionKind, watch::Receiver<Option<ArcStr>>>,
    /// Kinds whose first result has not arrived yet
    pending: BTreeSet<OptionKind>,
    pub state: BuilderState,
}

impl BuilderForm {
    /// Creates an empty form subscribed to every facade list. Nothing is
    /// loaded until [`BuilderForm::init`].
    ///
    /// # Arguments
    /// * `facade` - Source of the option lists
    /// * `sandwiches` - Client used to save and to load for edit
    /// * `storage` - Where saved ids are remembered
    /// * `log` - The logging actor
    /// * `submit_timeout` - Limit for a save
    pub fn new(
        facade: OptionsFacade,
        sandwiches: SandwichApi,
        storage: Storage,
        log: Log,
        submit_timeout: Duration,
    ) -> Self {
        let lists_rx = OptionKind::ALL
            .into_iter()
            .map(|kind| (kind, facade.list(kind)))
            .collect();
        let errors_rx = OptionKind::ALL
            .into_iter()
            .map(|kind| (kind, facade.error(kind)))
            .collect();
        let state = BuilderState {
            steps: Step::all(true),
            ..Default::default()
        };
        Self {
            facade,
            sandwiches,
            storage,
            log,
            submit_timeout,
            lists_rx,
            errors_rx,
            pending: BTreeSet::new(),
            state,
        }
    }

    /// Drops the Name & Price step from the wizard.
    pub fn without_name_price_step(mut self) -> Self {
        self.state.steps = Step::all(false);
        self.state.step = self.state.step.min(self.state.steps.len() - 1);
        self
    }

    /// Starts loading every list. The form stays `loading` until each kind
    /// has produced a first result.
    pub fn init(&mut self) {
        self.pending = OptionKind::ALL.into_iter().collect();
        self.state.loading = true;
        self.facade.load_all();
        self.sync_from_facade();
    }

    /// Reloads every list from scratch.
    pub fn retry_all(&mut self) {
        self.state.list_errors.clear();
        self.state.lists.clear();
        self.init();
    }

    /// Reloads one list.
    pub fn retry_list(&mut self, kind: OptionKind) {
        self.state.list_errors.remove(&kind);
        self.facade.retry(kind);
    }

    fn absorb_list(&mut self, kind: OptionKind) {
        if let Some(rx) = self.lists_rx.get_mut(&kind) {
            let list = rx.borrow_and_update().clone();
            self.state.lists.insert(kind, list);
            self.pending.remove(&kind);
        }
    }

    fn absorb_error(&mut self, kind: OptionKind) {
        if let Some(rx) = self.errors_rx.get_mut(&kind) {
            match rx.borrow_and_update().clone() {
                Some(error) => self.state.list_errors.insert(kind, error),
                None => self.state.list_errors.remove(&kind),
            };
        }
    }

    /// Copies whatever the facade published since the last call. Returns
    /// whether anything changed.
    pub fn sync_from_facade(&mut self) -> bool {
        let mut changed = false;
        for kind in OptionKind::ALL {
            let list_changed = self
                .lists_rx
                .get(&kind)
                .is_some_and(|rx| rx.has_changed().unwrap_or(false));
            if list_changed {
                self.absorb_list(kind);
                changed = true;
            }
            let error_changed = self
                .errors_rx
                .get(&kind)
                .is_some_and(|rx| rx.has_changed().unwrap_or(false));
            if error_changed {
                self.absorb_error(kind);
                changed = true;
            }
        }
        self.state.loading = !self.pending.is_empty();
        changed
    }

    /// Waits until every pending list produced its first result.
    pub async fn wait_loaded(&mut self) {
        let pending: Vec<_> = self.pending.iter().copied().collect();
        for kind in pending {
            if let Some(rx) = self.lists_rx.get_mut(&kind) {
                let _ = rx.changed().await;
            }
            self.absorb_list(kind);
        }
        self.sync_from_facade();
    }

    /// Moves one step forward, staying on the last one.
    pub fn next_step(&mut self) {
        self.go_to_step(self.state.step + 1);
    }

    /// Moves one step back, staying on the first one.
    pub fn prev_step(&mut self) {
        self.go_to_step(self.state.step.saturating_sub(1));
    }

    /// Jumps to step `index`, clamped into range. No validation is done on
    /// the way.
    pub fn go_to_step(&mut self, index: usize) {
        let last = self.state.steps.len().saturating_sub(1);
        let index = index.min(last);
        if index != self.state.step {
            self.state.cursor = 0;
        }
        self.state.step = index;
    }

    /// Checks or unchecks an option.
    ///
    /// # Arguments
    /// * `kind` - The category of the option
    /// * `id` - The option id
    /// * `checked` - Whether the option ends up selected. Checking clears the
    ///   "no-X" flag of the category
    pub fn toggle(&mut self, kind: OptionKind, id: i64, checked: bool) {
        self.state.selected.toggle(kind, id, checked);
    }

    /// Sets the "no-X" flag of `kind`. Turning it on unchecks every option of the
    /// category. Ignored for bread.
    pub fn toggle_none(&mut self, kind: OptionKind, on: bool) {
        self.state.selected.set_none(kind, on);
    }

    /// Sets whether the sandwich is toasted.
    pub fn set_toasted(&mut self, toasted: bool) {
        self.state.selected.toasted = toasted;
    }

    /// Sets the name, dropping any name error from a rejected save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.selected.name = name.into();
        self.state.name_error = None;
    }

    /// Sets the price from user input. Blank or unparsable input clears it.
    pub fn set_price_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.selected.price = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0);
        self.state.price_text = text;
    }

    /// Whether the form may be saved.
    ///
    /// # Returns
    /// `true` when the name is not blank, a bread is chosen and every other
    /// category has an option or its "no-X" flag.
    pub fn can_submit(&self) -> bool {
        self.state.selected.can_submit()
    }

    /// Human readable rows of the selection, skipping empty ones.
    pub fn selection_summary(&self) -> Vec<SummaryRow> {
        let state = &self.state;
        let selected = &state.selected;
        let mut rows = Vec::new();

        for kind in OptionKind::ALL {
            let values: Vec<String> = if selected.none(kind) {
                vec!["None".to_string()]
            } else {
                selected
                    .ids(kind)
                    .iter()
                    .filter_map(|id| state.label(kind, *id))
                    .map(str::to_string)
                    .collect()
            };
            rows.push(SummaryRow {
                name: kind.title(),
                values,
            });
        }
        if selected.toasted {
            rows.push(SummaryRow {
                name: "Toasted",
                values: vec!["Yes".to_string()],
            });
        }
        if !selected.name.trim().is_empty() {
            rows.push(SummaryRow {
                name: "Name",
                values: vec![selected.name.trim().to_string()],
            });
        }
        if let Some(price) = selected.price {
            rows.push(SummaryRow {
                name: "Price",
                values: vec![format!("{price:.2}")],
            });
        }

        rows.retain(|row| !row.values.is_empty());
        rows
    }

    /// Hides the success and error banners.
    pub fn clear_messages(&mut self) {
        self.state.success = None;
        self.state.error = None;
    }

    /// Switches to edit mode and fills the selection from sandwich `id`.
    ///
    /// Structured composition is used when the backend sends it. Otherwise
    /// the description is parsed against the loaded lists, so this waits for
    /// them first.
    pub async fn load_for_edit(&mut self, id: i64) -> Result<(), ApiError> {
        self.state.mode = Mode::Edit(id);
        let sandwich = match self.sandwiches.get(id).await {
            Ok(sandwich) => sandwich,
            Err(err) => {
                self.log
                    .warn(SCOPE, format!("Loading sandwich {id} failed: {err}"));
                self.state.error = Some(format!("Failed to load sandwich: {err}").into());
                return Err(err);
            }
        };
        if !sandwich.has_composition() {
            self.wait_loaded().await;
        }
        self.apply_sandwich(&sandwich);
        Ok(())
    }

    /// Fills the selection from a fetched sandwich.
    pub fn apply_sandwich(&mut self, sandwich: &Sandwich) {
        let mut selection = Selection {
            name: sandwich.name.clone(),
            price: sandwich.price,
            ..Default::default()
        };

        if sandwich.has_composition() {
            selection.bread_id = sandwich.bread_id;
            let parts = [
                (OptionKind::Cheeses, &sandwich.cheese_ids, sandwich.no_cheese),
                (OptionKind::Dressings, &sandwich.dressing_ids, sandwich.no_dressing),
                (OptionKind::Meats, &sandwich.meat_ids, sandwich.no_meat),
                (OptionKind::Toppings, &sandwich.topping_ids, sandwich.no_toppings),
            ];
            for (kind, ids, none) in parts {
                for id in ids.iter().flatten() {
                    selection.toggle(kind, *id, true);
                }
                if none.unwrap_or(false) {
                    selection.set_none(kind, true);
                }
            }
            selection.toasted = sandwich.toasted.unwrap_or(false);
        } else {
            parse_description(sandwich.description(), &self.state.lists).apply(&mut selection);
            if let Some(toasted) = sandwich.toasted {
                selection.toasted = toasted;
            }
        }

        self.state.price_text = selection.price.map(|p| format!("{p:.2}")).unwrap_or_default();
        self.state.selected = selection;
    }

    /// Starts a submission. Returns `None` when one is already in flight or
    /// the form is incomplete.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.state.submitting {
            return None;
        }
        if !self.can_submit() {
            self.state.error = Some("Please complete every step before saving.".into());
            return None;
        }

        self.clear_messages();
        self.clear_field_errors();
        self.state.submitting = true;
        Some(SubmitRequest {
            mode: self.state.mode,
            payload: self.state.selected.to_payload(),
            api: self.sandwiches.clone(),
            timeout: self.submit_timeout,
        })
    }

    /// Applies the result of a submission to the form.
    pub async fn finish_submit(&mut self, result: SubmitResult) -> SubmitOutcome {
        self.state.submitting = false;
        match result {
            Ok(id) => {
                if let Some(id) = id {
                    let _ = self
                        .log
                        .warn_on_error(SCOPE, self.storage.remember_sandwich(id).await);
                }
                self.log.info(SCOPE, format!("Saved sandwich {id:?}"));
                self.state.success = Some("Sandwich saved!".into());
                SubmitOutcome::Saved {
                    id,
                    redirect_after: REDIRECT_DELAY,
                }
            }
            Err(ApiError::Validation(errors)) => {
                self.log.info(SCOPE, format!("Save rejected: {errors:?}"));
                if self.apply_field_errors(&errors) {
                    SubmitOutcome::Invalid
                } else {
                    let err = ApiError::Validation(errors);
                    self.state.error = Some(format!("Save failed: {err}").into());
                    SubmitOutcome::Failed
                }
            }
            Err(err) => {
                self.log.warn(SCOPE, format!("Save failed: {err}"));
                self.state.error = Some(format!("Save failed: {err}").into());
                SubmitOutcome::Failed
            }
        }
    }

    fn clear_field_errors(&mut self) {
        self.state.field_errors.clear();
        self.state.name_error = None;
    }

    /// Replaces the field errors with those of a rejected save. Returns
    /// whether any field was recognised.
    fn apply_field_errors(&mut self, errors: &BTreeMap<String, String>) -> bool {
        self.clear_field_errors();
        let mut matched = false;
        for kind in OptionKind::ALL {
            let message = kind
                .error_fields()
                .iter()
                .find_map(|field| errors.get(*field));
            if let Some(message) = message {
                self.state
                    .field_errors
                    .insert(kind, ArcStr::from(message.as_str()));
                matched = true;
            }
        }
        if let Some(message) = errors.get("name") {
            self.state.name_error = Some(ArcStr::from(message.as_str()));
            matched = true;
        }
        matched
    }

    /// Submits and waits for the result. A second call while a submission
    /// is in flight is ignored.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Ignored;
        };
        let result = request.run().await;
        self.finish_submit(result).await
    }
}
