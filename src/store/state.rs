//! Session state held by one store.

use serde::{Deserialize, Serialize};

use crate::compare::{columns_equal, values_equal};
use crate::preset::{FieldValues, SearchConfigInfo, ViewMode};

/// What the user is looking at in one widget instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub page_name: String,
    pub current_field_values: FieldValues,
    pub displayed_column_ids: Vec<String>,
    pub view_mode: ViewMode,
    /// The preset backing the live session, if it still matches it.
    pub current_preset: Option<SearchConfigInfo>,
    /// Known presets, unique by id, in load order.
    pub all_presets: Vec<SearchConfigInfo>,
    pub selected_group_key: String,
    /// Predefined (non-preset) group keys.
    pub group_keys: Vec<String>,
    pub edit_mode: bool,
    /// Identity of the store that owns edit mode; empty when nobody edits.
    pub in_charge_of_edit: String,
    pub pre_edit: Option<EditSnapshot>,
    pub revert: Option<Revert>,
}

/// Copy of the session taken when entering edit mode.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSnapshot {
    pub current_field_values: FieldValues,
    pub displayed_column_ids: Vec<String>,
    pub view_mode: ViewMode,
    pub current_preset: Option<SearchConfigInfo>,
    pub selected_group_key: String,
}

/// Produced by cancelling an edit: what the host page should repaint.
#[derive(Clone, Debug, PartialEq)]
pub enum Revert {
    /// The session was backed by this preset before the edit.
    Preset(SearchConfigInfo),
    /// The session held unsaved values; restore them as they were.
    PageData(PageData),
}

/// Logical page snapshot a host applies when no preset governs the view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub page_name: String,
    pub field_values: FieldValues,
    pub displayed_column_ids: Vec<String>,
    pub view_mode: ViewMode,
}

impl SessionState {
    pub fn new(page_name: impl Into<String>, selected_group_key: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            selected_group_key: selected_group_key.into(),
            ..Self::default()
        }
    }

    pub fn preset(&self, id: &str) -> Option<&SearchConfigInfo> {
        self.all_presets.iter().find(|p| p.id == id)
    }

    /// A columns-bearing preset with the given name.
    pub fn column_preset_named(&self, name: &str) -> Option<&SearchConfigInfo> {
        self.all_presets
            .iter()
            .find(|p| p.has_columns() && p.name == name)
    }

    pub fn is_current(&self, id: &str) -> bool {
        self.current_preset.as_ref().is_some_and(|p| p.id == id)
    }

    /// Whether the live session shows exactly what `preset` holds: the same
    /// values, the same column set and the same view mode.
    pub fn matches(&self, preset: &SearchConfigInfo) -> bool {
        values_equal(&preset.values, &self.current_field_values)
            && columns_equal(&preset.columns, &self.displayed_column_ids)
            && preset.view_mode() == self.view_mode
    }

    /// Make `preset` current and align the live session to it.
    ///
    /// Empty aspects are applied too, so a columns-only preset clears the
    /// field values. Columns already set-equal keep their order.
    pub(crate) fn activate(&mut self, preset: SearchConfigInfo) {
        self.current_field_values = preset.values.clone();
        self.view_mode = preset.view_mode();
        if !columns_equal(&preset.columns, &self.displayed_column_ids) {
            self.displayed_column_ids = preset.columns.clone();
        }
        self.current_preset = Some(preset);
    }

    /// Re-point `current_preset` at its entry in `all_presets`.
    ///
    /// Cleared when the entry is gone, or when it no longer matches the live
    /// session outside edit mode.
    pub(crate) fn refresh_current(&mut self) {
        let Some(current) = self.current_preset.as_ref() else {
            return;
        };
        self.current_preset = match self.preset(&current.id) {
            Some(fresh) if self.edit_mode || self.matches(fresh) => Some(fresh.clone()),
            _ => None,
        };
    }

    /// Insert or replace by id. Returns `false` if an identical entry exists.
    pub(crate) fn upsert_preset(&mut self, preset: SearchConfigInfo) -> bool {
        match self.all_presets.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) if *existing == preset => false,
            Some(existing) => {
                *existing = preset;
                true
            }
            None => {
                self.all_presets.push(preset);
                true
            }
        }
    }

    pub fn page_data(&self) -> PageData {
        PageData {
            page_name: self.page_name.clone(),
            field_values: self.current_field_values.clone(),
            displayed_column_ids: self.displayed_column_ids.clone(),
            view_mode: self.view_mode,
        }
    }

    pub(crate) fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            current_field_values: self.current_field_values.clone(),
            displayed_column_ids: self.displayed_column_ids.clone(),
            view_mode: self.view_mode,
            current_preset: self.current_preset.clone(),
            selected_group_key: self.selected_group_key.clone(),
        }
    }
}

/// Keep the last occurrence of every id, in first-seen order.
pub(crate) fn dedup_by_id(list: Vec<SearchConfigInfo>) -> Vec<SearchConfigInfo> {
    let mut out: Vec<SearchConfigInfo> = Vec::with_capacity(list.len());
    for preset in list {
        match out.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset,
            None => out.push(preset),
        }
    }
    out
}
