//! Preset entity model.
//!
//! A preset (`SearchConfigInfo`) is a named, persisted combination of filter
//! values and/or a visible-column selection for one page. Presets carry no
//! behavior beyond classification: whether they save values, columns, or both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical field-value mapping: field name to its persisted string form.
pub type FieldValues = BTreeMap<String, String>;

/// A saved search configuration as returned by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfigInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: FieldValues,
    #[serde(default)]
    pub is_readonly: bool,
    #[serde(default)]
    pub is_advanced: bool,
}

impl SearchConfigInfo {
    /// Create an empty preset with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the saved column ids.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a saved field value.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Mark the preset as readonly.
    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    /// Mark the saved values as belonging to the advanced view.
    pub fn advanced(mut self) -> Self {
        self.is_advanced = true;
        self
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn kind(&self) -> PresetKind {
        PresetKind::of(self)
    }

    /// The view mode the saved values were captured in.
    pub fn view_mode(&self) -> ViewMode {
        if self.is_advanced {
            ViewMode::Advanced
        } else {
            ViewMode::Basic
        }
    }
}

/// Classification of a preset by what it saves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetKind {
    ValuesOnly,
    ColumnsOnly,
    Both,
    /// Saves nothing. Not produced by the widgets, tolerated when loaded.
    Neither,
}

impl PresetKind {
    pub fn of(preset: &SearchConfigInfo) -> Self {
        match (preset.has_values(), preset.has_columns()) {
            (true, true) => PresetKind::Both,
            (true, false) => PresetKind::ValuesOnly,
            (false, true) => PresetKind::ColumnsOnly,
            (false, false) => PresetKind::Neither,
        }
    }
}

/// Search page view mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Basic,
    Advanced,
}

/// Column metadata handed to the column group widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub name_key: String,
    /// Predefined groups this column belongs to.
    #[serde(default)]
    pub predefined_group_keys: Vec<String>,
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn in_groups<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predefined_group_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn belongs_to(&self, group_key: &str) -> bool {
        self.predefined_group_keys.iter().any(|k| k == group_key)
    }
}
