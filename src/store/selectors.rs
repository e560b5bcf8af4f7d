//! Derived view models.
//!
//! Every selector is a pure function of a projection of the session state.
//! Results are memoized on that projection, so reading a selector after a
//! no-op update returns the cached value without recomputing.

use serde::{Deserialize, Serialize};

use super::state::{PageData, SessionState};
use crate::preset::SearchConfigInfo;

/// Presets split by what they save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetLists {
    /// Presets that save field values (values-only and both).
    pub with_values: Vec<SearchConfigInfo>,
    /// Presets that save columns (columns-only and both).
    pub with_columns: Vec<SearchConfigInfo>,
    pub with_both: Vec<SearchConfigInfo>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditModeView {
    pub edit_mode: bool,
    /// Only the store that entered edit mode shows edit affordances.
    pub is_in_charge_of_edit: bool,
}

/// What the search-config widget renders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfigView {
    pub current_preset: Option<SearchConfigInfo>,
    pub presets: Vec<SearchConfigInfo>,
    pub edit: EditModeView,
}

/// What the column-group widget renders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroupView {
    pub selected_group_key: String,
    pub all_group_keys: Vec<String>,
    pub current_preset: Option<SearchConfigInfo>,
    pub edit: EditModeView,
}

/// How many times each selector actually recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectorStats {
    pub preset_lists: usize,
    pub all_group_keys: usize,
    pub page_data: usize,
    pub edit_mode: usize,
}

pub(crate) struct Memo<I, O> {
    cached: Option<(I, O)>,
    recomputations: usize,
}

impl<I, O> Default for Memo<I, O> {
    fn default() -> Self {
        Self {
            cached: None,
            recomputations: 0,
        }
    }
}

impl<I: PartialEq, O: Clone> Memo<I, O> {
    pub(crate) fn get(&mut self, input: I, compute: impl FnOnce(&I) -> O) -> O {
        if let Some((cached_input, output)) = &self.cached {
            if *cached_input == input {
                return output.clone();
            }
        }
        let output = compute(&input);
        self.recomputations += 1;
        self.cached = Some((input, output.clone()));
        output
    }

    pub(crate) fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[derive(Default)]
pub(crate) struct Selectors {
    pub(crate) preset_lists: Memo<Vec<SearchConfigInfo>, PresetLists>,
    pub(crate) all_group_keys: Memo<(Vec<String>, Vec<SearchConfigInfo>, String), Vec<String>>,
    pub(crate) page_data: Memo<PageData, PageData>,
    pub(crate) edit_mode: Memo<(bool, bool), EditModeView>,
}

impl Selectors {
    pub(crate) fn stats(&self) -> SelectorStats {
        SelectorStats {
            preset_lists: self.preset_lists.recomputations(),
            all_group_keys: self.all_group_keys.recomputations(),
            page_data: self.page_data.recomputations(),
            edit_mode: self.edit_mode.recomputations(),
        }
    }

    pub(crate) fn preset_lists(&mut self, state: &SessionState) -> PresetLists {
        self.preset_lists
            .get(state.all_presets.clone(), |presets| split_presets(presets))
    }

    pub(crate) fn all_group_keys(&mut self, state: &SessionState) -> Vec<String> {
        let input = (
            state.group_keys.clone(),
            state.all_presets.clone(),
            state.selected_group_key.clone(),
        );
        self.all_group_keys
            .get(input, |(keys, presets, selected)| {
                collect_group_keys(keys, presets, selected)
            })
    }

    pub(crate) fn page_data(&mut self, state: &SessionState) -> PageData {
        self.page_data.get(state.page_data(), |data| data.clone())
    }

    pub(crate) fn edit_mode(&mut self, state: &SessionState, identity: &str) -> EditModeView {
        let input = (state.edit_mode, state.in_charge_of_edit == identity);
        self.edit_mode
            .get(input, |(edit_mode, in_charge)| EditModeView {
                edit_mode: *edit_mode,
                is_in_charge_of_edit: *edit_mode && *in_charge,
            })
    }
}

pub(crate) fn split_presets(presets: &[SearchConfigInfo]) -> PresetLists {
    let mut lists = PresetLists::default();
    for preset in presets {
        if preset.has_values() {
            lists.with_values.push(preset.clone());
        }
        if preset.has_columns() {
            lists.with_columns.push(preset.clone());
        }
        if preset.has_values() && preset.has_columns() {
            lists.with_both.push(preset.clone());
        }
    }
    lists
}

/// Predefined keys, then column preset names, then the selected key.
pub(crate) fn collect_group_keys(
    predefined: &[String],
    presets: &[SearchConfigInfo],
    selected: &str,
) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let candidates = predefined
        .iter()
        .map(String::as_str)
        .chain(presets.iter().filter(|p| p.has_columns()).map(|p| p.name.as_str()))
        .chain(std::iter::once(selected));

    for key in candidates {
        if !key.is_empty() && !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}
