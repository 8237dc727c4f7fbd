use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use regex::Regex;

use super::data::Selection;
use crate::{
    ArcSlice,
    api::{OptionKind, SandwichOption},
};

static TOASTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*?)\s*\(toasted\)\s*$").expect("valid regex"));

/// Selection recovered from a sandwich description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDescription {
    pub ids: BTreeMap<OptionKind, Vec<i64>>,
    pub none: BTreeSet<OptionKind>,
    pub toasted: bool,
}

impl ParsedDescription {
    /// Copies the recovered choices into `selection`, leaving name and price
    /// alone.
    pub fn apply(&self, selection: &mut Selection) {
        selection.toasted = self.toasted;
        for kind in OptionKind::ALL {
            let ids = self.ids.get(&kind).map(Vec::as_slice).unwrap_or_default();
            match kind {
                OptionKind::Breads => selection.bread_id = ids.first().copied(),
                _ => {
                    selection.set_none(kind, false);
                    for id in selection.ids(kind).to_vec() {
                        selection.toggle(kind, id, false);
                    }
                    for id in ids {
                        selection.toggle(kind, *id, true);
                    }
                    if self.none.contains(&kind) {
                        selection.set_none(kind, true);
                    }
                }
            }
        }
    }
}

fn kind_for(label: &str) -> Option<OptionKind> {
    let label = label.trim().to_lowercase();
    let label = label.trim_end_matches('s');
    OptionKind::ALL
        .into_iter()
        .find(|kind| kind.as_str().trim_end_matches('s') == label)
}

/// Parses `"Bread: Rye (toasted); Cheese: Swiss, Cheddar; Dressing: none"`.
///
/// Labels are matched case-insensitively against `lists`, first match wins.
/// Unknown segments and unmatched labels are dropped.
pub fn parse_description(
    description: &str,
    lists: &BTreeMap<OptionKind, ArcSlice<SandwichOption>>,
) -> ParsedDescription {
    let mut parsed = ParsedDescription::default();

    for segment in description.split(';') {
        let Some((label, values)) = segment.split_once(':') else {
            continue;
        };
        let Some(kind) = kind_for(label) else {
            continue;
        };
        let options = lists.get(&kind).map(|l| &**l).unwrap_or_default();

        for value in values.split(',') {
            let mut value = value.trim();
            if kind == OptionKind::Breads {
                if let Some(caps) = TOASTED.captures(value) {
                    parsed.toasted = true;
                    value = caps.get(1).map_or("", |m| m.as_str()).trim();
                }
            }
            if value.is_empty() {
                continue;
            }
            if value.eq_ignore_ascii_case("none") {
                if kind != OptionKind::Breads {
                    parsed.none.insert(kind);
                }
                continue;
            }
            let wanted = value.to_lowercase();
            let Some(option) = options
                .iter()
                .find(|opt| opt.label.trim().to_lowercase() == wanted)
            else {
                continue;
            };
            let ids = parsed.ids.entry(kind).or_default();
            if !ids.contains(&option.id) {
                ids.push(option.id);
            }
        }
    }

    parsed
}
