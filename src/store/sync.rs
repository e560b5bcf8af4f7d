//! Applying peer messages received on the page topic.

use std::sync::atomic::Ordering;

use tracing::debug;

use super::SearchConfigStore;
use crate::topic::{TopicMessage, TopicPayload};

impl SearchConfigStore {
    /// Apply a message from the page topic.
    ///
    /// Messages this store published itself are dropped. Everything else is
    /// dispatched to the matching updater without publishing, so a diff never
    /// bounces between stores.
    pub fn store_update(&self, message: &TopicMessage) {
        let counters = &self.inner.counters;
        if message.is_from(self.identity()) {
            counters.echoes_ignored.fetch_add(1, Ordering::SeqCst);
            return;
        }
        counters.applied.fetch_add(1, Ordering::SeqCst);

        let changed = match &message.payload {
            TopicPayload::SearchConfigs { configs } => {
                self.set_search_configs_with(configs.clone(), false)
            }
            TopicPayload::Change { config } => self.set_current_config_with(config.clone(), false),
            TopicPayload::Delete { config } => self.delete_search_config_with(config, false),
            TopicPayload::Add { config } => self.add_search_config_with(config.clone(), false),
            TopicPayload::FieldValues { values } => {
                self.update_field_values_with(values.clone(), false)
            }
            TopicPayload::DisplayedColumns { column_ids } => {
                self.update_displayed_columns_ids_with(column_ids.clone(), false)
            }
            TopicPayload::ViewMode { view_mode } => self.update_view_mode_with(*view_mode, false),
            TopicPayload::SelectedGroupKey { key } => self.select_group_with(key.clone(), None, false),
            TopicPayload::EditMode {
                edit_mode,
                in_charge_of_edit,
            } => self.apply_edit_mode(*edit_mode, in_charge_of_edit.clone()),
            TopicPayload::Edit { config } => self.edit_search_config(config.clone()),
        };

        debug!(
            store = %self.identity(),
            from = %message.store_identity,
            message = message.name(),
            changed,
            "applied peer message"
        );
    }
}
