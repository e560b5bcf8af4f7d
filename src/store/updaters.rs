//! Update operations.
//!
//! Each public operation publishes its diff to the page topic when it
//! changed the session. The `update_stores = false` variants are used when
//! applying a peer's message, so nothing is published back.

use super::state::dedup_by_id;
use super::SearchConfigStore;
use crate::compare::{columns_equal, values_equal};
use crate::preset::{FieldValues, SearchConfigInfo, ViewMode};
use crate::topic::TopicPayload;

impl SearchConfigStore {
    pub fn set_page_name(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.mutate("set_page_name", |s| s.page_name = name).is_some()
    }

    /// Replace the live field values.
    ///
    /// The current preset is kept only if its values still equal the new
    /// ones.
    pub fn update_field_values(&self, values: FieldValues) -> bool {
        self.update_field_values_with(values, true)
    }

    pub(crate) fn update_field_values_with(&self, values: FieldValues, update_stores: bool) -> bool {
        let committed = self.mutate("update_field_values", |s| {
            if values_equal(&s.current_field_values, &values) {
                return;
            }
            s.current_field_values = values.clone();
            let stale = s
                .current_preset
                .as_ref()
                .is_some_and(|p| !values_equal(&p.values, &s.current_field_values));
            if stale && !s.edit_mode {
                s.current_preset = None;
            }
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::FieldValues { values });
        }
        committed.is_some()
    }

    /// Replace the live visible-column selection.
    pub fn update_displayed_columns_ids(&self, ids: Vec<String>) -> bool {
        self.update_displayed_columns_ids_with(ids, true)
    }

    pub(crate) fn update_displayed_columns_ids_with(
        &self,
        ids: Vec<String>,
        update_stores: bool,
    ) -> bool {
        let committed = self.mutate("update_displayed_columns_ids", |s| {
            if s.displayed_column_ids == ids {
                return;
            }
            s.displayed_column_ids = ids.clone();
            let stale = s
                .current_preset
                .as_ref()
                .is_some_and(|p| !columns_equal(&p.columns, &s.displayed_column_ids));
            if stale && !s.edit_mode {
                s.current_preset = None;
            }
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::DisplayedColumns { column_ids: ids });
        }
        committed.is_some()
    }

    pub fn update_view_mode(&self, mode: ViewMode) -> bool {
        self.update_view_mode_with(mode, true)
    }

    pub(crate) fn update_view_mode_with(&self, mode: ViewMode, update_stores: bool) -> bool {
        let committed = self.mutate("update_view_mode", |s| {
            if s.view_mode == mode {
                return;
            }
            s.view_mode = mode;
            let stale = s
                .current_preset
                .as_ref()
                .is_some_and(|p| p.view_mode() != mode);
            if stale && !s.edit_mode {
                s.current_preset = None;
            }
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::ViewMode { view_mode: mode });
        }
        committed.is_some()
    }

    /// Replace the whole preset list (initial load or full resync).
    pub fn set_search_configs(&self, configs: Vec<SearchConfigInfo>) -> bool {
        self.set_search_configs_with(configs, true)
    }

    pub(crate) fn set_search_configs_with(
        &self,
        configs: Vec<SearchConfigInfo>,
        update_stores: bool,
    ) -> bool {
        let configs = dedup_by_id(configs);
        let committed = self.mutate("set_search_configs", |s| {
            if s.all_presets == configs {
                return;
            }
            s.all_presets = configs.clone();
            s.refresh_current();
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::SearchConfigs { configs });
        }
        committed.is_some()
    }

    pub fn add_search_config(&self, config: SearchConfigInfo) -> bool {
        self.add_search_config_with(config, true)
    }

    pub(crate) fn add_search_config_with(
        &self,
        config: SearchConfigInfo,
        update_stores: bool,
    ) -> bool {
        let committed = self.mutate("add_search_config", |s| {
            if s.upsert_preset(config.clone()) {
                s.refresh_current();
            }
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::Add { config });
        }
        committed.is_some()
    }

    /// Replace an existing preset. Publishes nothing; peers learn about saved
    /// edits through `save_edit`.
    pub fn edit_search_config(&self, config: SearchConfigInfo) -> bool {
        self.mutate("edit_search_config", |s| {
            if s.preset(&config.id).is_none() {
                return;
            }
            if s.upsert_preset(config.clone()) {
                s.refresh_current();
            }
        })
        .is_some()
    }

    pub fn delete_search_config(&self, config: &SearchConfigInfo) -> bool {
        self.delete_search_config_with(config, true)
    }

    pub(crate) fn delete_search_config_with(
        &self,
        config: &SearchConfigInfo,
        update_stores: bool,
    ) -> bool {
        let custom_key = self.group_config().map(|g| g.custom_group_key.clone());
        let committed = self.mutate("delete_search_config", |s| {
            let Some(index) = s.all_presets.iter().position(|p| p.id == config.id) else {
                return;
            };
            let removed = s.all_presets.remove(index);
            if s.is_current(&removed.id) {
                s.current_preset = None;
            }
            if let Some(custom_key) = custom_key {
                if s.selected_group_key == removed.name
                    && s.column_preset_named(&removed.name).is_none()
                {
                    s.selected_group_key = custom_key;
                }
            }
        });
        if committed.is_some() && update_stores {
            self.publish(TopicPayload::Delete {
                config: config.clone(),
            });
        }
        committed.is_some()
    }

    /// Select a preset (or none). Ignored while in edit mode and for presets
    /// this store does not know.
    ///
    /// Activating a preset copies its values, columns and view mode into the
    /// live session.
    pub fn set_current_config(&self, config: Option<SearchConfigInfo>) -> bool {
        self.set_current_config_with(config, true)
    }

    pub(crate) fn set_current_config_with(
        &self,
        config: Option<SearchConfigInfo>,
        update_stores: bool,
    ) -> bool {
        let committed = self.mutate("set_current_config", |s| {
            if s.edit_mode {
                return;
            }
            match &config {
                Some(requested) => {
                    if let Some(stored) = s.preset(&requested.id).cloned() {
                        s.activate(stored);
                    }
                }
                None => s.current_preset = None,
            }
        });
        match committed {
            Some(state) => {
                if update_stores {
                    self.publish(TopicPayload::Change {
                        config: state.current_preset,
                    });
                }
                true
            }
            None => false,
        }
    }

    /// Select a group key. Outside edit mode a columns-bearing preset of that
    /// name becomes current; any other key clears the current preset.
    pub fn set_selected_group_key(&self, key: impl Into<String>) -> bool {
        self.select_group_with(key.into(), None, true)
    }

    /// Select a predefined group together with the columns it shows, in one
    /// step.
    pub fn select_group(&self, key: impl Into<String>, column_ids: Vec<String>) -> bool {
        self.select_group_with(key.into(), Some(column_ids), true)
    }

    pub(crate) fn select_group_with(
        &self,
        key: String,
        column_ids: Option<Vec<String>>,
        update_stores: bool,
    ) -> bool {
        let before = self.state();
        let committed = self.mutate("set_selected_group_key", |s| {
            let mut activated = false;
            if s.selected_group_key != key {
                s.selected_group_key = key.clone();
                if !s.edit_mode {
                    match s.column_preset_named(&key).cloned() {
                        Some(preset) => {
                            s.activate(preset);
                            activated = true;
                        }
                        None => s.current_preset = None,
                    }
                }
            }
            if let Some(ids) = &column_ids {
                if !activated {
                    s.displayed_column_ids = ids.clone();
                }
            }
            let stale = s.current_preset.as_ref().is_some_and(|p| !s.matches(p));
            if stale && !s.edit_mode {
                s.current_preset = None;
            }
        });

        let Some(after) = committed else {
            return false;
        };
        if update_stores {
            let preset_changed = after.current_preset != before.current_preset;
            if preset_changed {
                self.publish(TopicPayload::Change {
                    config: after.current_preset.clone(),
                });
            }
            let owned_by_preset = preset_changed && after.current_preset.is_some();
            if after.displayed_column_ids != before.displayed_column_ids && !owned_by_preset {
                self.publish(TopicPayload::DisplayedColumns {
                    column_ids: after.displayed_column_ids.clone(),
                });
            }
            if after.selected_group_key != before.selected_group_key {
                self.publish(TopicPayload::SelectedGroupKey {
                    key: after.selected_group_key,
                });
            }
        }
        true
    }

    /// Set the predefined (non-preset) group keys.
    pub fn set_group_keys(&self, keys: Vec<String>) -> bool {
        self.mutate("set_group_keys", |s| s.group_keys = keys).is_some()
    }
}
