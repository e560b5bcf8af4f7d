//! Output events a widget raises towards its host page.
//!
//! Events are delivered through an `EventEmitter`, which runs every listener
//! on its own thread. Hosts must not assume a listener has run when the
//! triggering call returns.

use std::sync::{Arc, Mutex, PoisonError};

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};

use crate::preset::{Column, FieldValues, ViewMode};
use crate::store::PageData;

pub const PRESET_SELECTED: &str = "presetSelected";
pub const SELECTION_CHANGED: &str = "selectionChanged";

/// The host page should show these inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSelected {
    pub input_values: FieldValues,
    pub displayed_columns: Vec<String>,
    pub view_mode: ViewMode,
}

impl From<PageData> for PresetSelected {
    fn from(data: PageData) -> Self {
        Self {
            input_values: data.field_values,
            displayed_columns: data.displayed_column_ids,
            view_mode: data.view_mode,
        }
    }
}

/// The host page should show these columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChanged {
    pub active_columns: Vec<Column>,
    pub group_key: String,
}

/// Shared emitter handle. Clones deliver to the same listeners.
#[derive(Clone)]
pub struct OutputEvents {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for OutputEvents {
    fn default() -> Self {
        Self {
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }
}

impl OutputEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_preset_selected<F>(&self, listener: F)
    where
        F: Fn(PresetSelected) + Send + Sync + 'static,
    {
        self.lock().on(PRESET_SELECTED, listener);
    }

    pub fn on_selection_changed<F>(&self, listener: F)
    where
        F: Fn(SelectionChanged) + Send + Sync + 'static,
    {
        self.lock().on(SELECTION_CHANGED, listener);
    }

    pub(crate) fn preset_selected(&self, event: PresetSelected) {
        self.lock().emit(PRESET_SELECTED, event);
    }

    pub(crate) fn selection_changed(&self, event: SelectionChanged) {
        self.lock().emit(SELECTION_CHANGED, event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventEmitter> {
        self.emitter.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
