use std::{collections::BTreeMap, fmt::Display};

use crate::{
    ArcSlice, ArcStr,
    api::{OptionKind, SandwichOption, SandwichPayload},
};

/// Whether the form creates a new sandwich or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Create,
    Edit(i64),
}

/// One page of the builder wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Bread,
    Cheese,
    Dressing,
    Meat,
    Toppings,
    NamePrice,
}

impl Step {
    /// The wizard pages in order, with or without the Name & Price page.
    pub fn all(with_name_price: bool) -> Vec<Step> {
        let mut steps = vec![
            Step::Bread,
            Step::Cheese,
            Step::Dressing,
            Step::Meat,
            Step::Toppings,
        ];
        if with_name_price {
            steps.push(Step::NamePrice);
        }
        steps
    }

    /// The option kind picked on this step, if any.
    pub fn kind(&self) -> Option<OptionKind> {
        match self {
            Step::Bread => Some(OptionKind::Breads),
            Step::Cheese => Some(OptionKind::Cheeses),
            Step::Dressing => Some(OptionKind::Dressings),
            Step::Meat => Some(OptionKind::Meats),
            Step::Toppings => Some(OptionKind::Toppings),
            Step::NamePrice => None,
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}", kind.title()),
            None => write!(f, "Name & Price"),
        }
    }
}

/// What the user picked so far.
///
/// A category list and its "no-X" flag are never both set: the toggles keep
/// them exclusive. Bread is single-choice and has no "none" flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub name: String,
    pub bread_id: Option<i64>,
    pub cheese_ids: Vec<i64>,
    pub dressing_ids: Vec<i64>,
    pub meat_ids: Vec<i64>,
    pub topping_ids: Vec<i64>,
    pub no_cheese: bool,
    pub no_dressing: bool,
    pub no_meat: bool,
    pub no_toppings: bool,
    pub toasted: bool,
    pub price: Option<f64>,
}

impl Selection {
    fn parts_mut(&mut self, kind: OptionKind) -> Option<(&mut Vec<i64>, &mut bool)> {
        match kind {
            OptionKind::Breads => None,
            OptionKind::Cheeses => Some((&mut self.cheese_ids, &mut self.no_cheese)),
            OptionKind::Dressings => Some((&mut self.dressing_ids, &mut self.no_dressing)),
            OptionKind::Meats => Some((&mut self.meat_ids, &mut self.no_meat)),
            OptionKind::Toppings => Some((&mut self.topping_ids, &mut self.no_toppings)),
        }
    }

    /// Chosen ids of `kind`.
    pub fn ids(&self, kind: OptionKind) -> &[i64] {
        match kind {
            OptionKind::Breads => self.bread_id.as_slice(),
            OptionKind::Cheeses => &self.cheese_ids,
            OptionKind::Dressings => &self.dressing_ids,
            OptionKind::Meats => &self.meat_ids,
            OptionKind::Toppings => &self.topping_ids,
        }
    }

    /// Whether option `id` of `kind` is checked.
    pub fn is_selected(&self, kind: OptionKind, id: i64) -> bool {
        self.ids(kind).contains(&id)
    }

    /// Whether "no-X" is set for `kind`. Always false for bread.
    pub fn none(&self, kind: OptionKind) -> bool {
        match kind {
            OptionKind::Breads => false,
            OptionKind::Cheeses => self.no_cheese,
            OptionKind::Dressings => self.no_dressing,
            OptionKind::Meats => self.no_meat,
            OptionKind::Toppings => self.no_toppings,
        }
    }

    /// Adds `id` when `checked`, removes it otherwise. Adding clears the
    /// "no-X" flag. Choosing a bread replaces the previous one.
    pub fn toggle(&mut self, kind: OptionKind, id: i64, checked: bool) {
        let Some((ids, none)) = self.parts_mut(kind) else {
            if checked {
                self.bread_id = Some(id);
            } else if self.bread_id == Some(id) {
                self.bread_id = None;
            }
            return;
        };

        if checked {
            if !ids.contains(&id) {
                ids.push(id);
            }
            *none = false;
        } else {
            ids.retain(|x| *x != id);
        }
    }

    /// Sets "no-X" for `kind`. Turning it on empties the chosen ids.
    pub fn set_none(&mut self, kind: OptionKind, on: bool) {
        if let Some((ids, none)) = self.parts_mut(kind) {
            *none = on;
            if on {
                ids.clear();
            }
        }
    }

    /// Whether `kind` has a choice: a bread, at least one id, or "no-X".
    pub fn satisfies(&self, kind: OptionKind) -> bool {
        !self.ids(kind).is_empty() || self.none(kind)
    }

    /// See [`crate::app::builder::BuilderForm::can_submit`].
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && OptionKind::ALL.iter().all(|k| self.satisfies(*k))
    }

    /// Builds the request body. The name is trimmed.
    pub fn to_payload(&self) -> SandwichPayload {
        SandwichPayload {
            name: self.name.trim().to_string(),
            bread_id: self.bread_id,
            cheese_ids: self.cheese_ids.clone(),
            dressing_ids: self.dressing_ids.clone(),
            meat_ids: self.meat_ids.clone(),
            topping_ids: self.topping_ids.clone(),
            no_cheese: self.no_cheese,
            no_dressing: self.no_dressing,
            no_meat: self.no_meat,
            no_toppings: self.no_toppings,
            toasted: self.toasted,
            price: self.price,
        }
    }
}

/// One line of the selection summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: &'static str,
    pub values: Vec<String>,
}

/// Everything the builder view renders.
#[derive(Debug, Clone, Default)]
pub struct BuilderState {
    pub mode: Mode,
    pub steps: Vec<Step>,
    pub step: usize,
    /// Highlighted row on the current step
    pub cursor: usize,
    pub lists: BTreeMap<OptionKind, ArcSlice<SandwichOption>>,
    /// Load errors from the facade
    pub list_errors: BTreeMap<OptionKind, ArcStr>,
    /// Validation errors from the last rejected save, replaced on each submit
    pub field_errors: BTreeMap<OptionKind, ArcStr>,
    pub name_error: Option<ArcStr>,
    pub selected: Selection,
    /// Raw price input, parsed into `selected.price`
    pub price_text: String,
    /// True until every list produced a first result
    pub loading: bool,
    pub submitting: bool,
    pub success: Option<ArcStr>,
    pub error: Option<ArcStr>,
}

impl BuilderState {
    /// The page being shown.
    pub fn current_step(&self) -> Step {
        self.steps.get(self.step).copied().unwrap_or(Step::Bread)
    }

    /// Loaded options of `kind`, empty until they arrive.
    pub fn list(&self, kind: OptionKind) -> &[SandwichOption] {
        self.lists.get(&kind).map(|l| &**l).unwrap_or_default()
    }

    /// Label of option `id` of `kind`, if it is in the loaded list.
    pub fn label(&self, kind: OptionKind, id: i64) -> Option<&str> {
        self.list(kind)
            .iter()
            .find(|opt| opt.id == id)
            .map(|opt| opt.label.as_str())
    }
}
