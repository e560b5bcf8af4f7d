use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::shell::Shell;
use super::{Dialog, HostContext, Notifier, OutputEvents, SelectionChanged, WidgetError};
use crate::api::SearchConfigApi;
use crate::compare::columns_equal;
use crate::preset::{Column, SearchConfigInfo};
use crate::store::{ColumnGroupView, GroupConfig, SearchConfigStore, SessionState};
use crate::topic::{Listener, SubscriptionHandle};

/// Visible-column selection of a search page.
///
/// Offers predefined column groups, saved column presets and a custom
/// selection. Raises [`SelectionChanged`] whenever the selected group or the
/// visible columns change.
pub struct ColumnGroupWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    shell: Shell<A, D, N>,
    groups: GroupConfig,
    columns: Arc<RwLock<Vec<Column>>>,
    watch: SubscriptionHandle,
}

fn active_columns(columns: &[Column], ids: &[String]) -> Vec<Column> {
    ids.iter()
        .filter_map(|id| columns.iter().find(|c| &c.id == id).cloned())
        .collect()
}

impl<A, D, N> ColumnGroupWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    /// Wrap `store`. Stores created without a group config use the default
    /// custom and default keys.
    pub fn new(store: SearchConfigStore, api: A, dialog: D, notifier: N, host: HostContext) -> Self {
        let groups = store.config().group.clone().unwrap_or_default();
        let shell = Shell::new("COLUMN_GROUP", store, api, dialog, notifier, host);
        let columns: Arc<RwLock<Vec<Column>>> = Arc::default();

        let events = shell.events.clone();
        let metadata = Arc::clone(&columns);
        let last: Mutex<Option<(String, Vec<String>)>> = Mutex::new(None);
        let listener: Listener<SessionState> = Arc::new(move |state: &SessionState| {
            let selection = (
                state.selected_group_key.clone(),
                state.displayed_column_ids.clone(),
            );
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            let first = last.is_none();
            if last.as_ref() == Some(&selection) {
                return;
            }
            *last = Some(selection);
            if first {
                return;
            }
            let metadata = metadata.read().unwrap_or_else(PoisonError::into_inner);
            events.selection_changed(SelectionChanged {
                active_columns: active_columns(&metadata, &state.displayed_column_ids),
                group_key: state.selected_group_key.clone(),
            });
        });
        let watch = shell.store.watch(listener);

        Self {
            shell,
            groups,
            columns,
            watch,
        }
    }

    pub fn store(&self) -> &SearchConfigStore {
        &self.shell.store
    }

    pub fn events(&self) -> &OutputEvents {
        &self.shell.events
    }

    pub fn on_selection_changed<F>(&self, listener: F)
    where
        F: Fn(SelectionChanged) + Send + Sync + 'static,
    {
        self.shell.events.on_selection_changed(listener);
    }

    pub fn view(&self) -> ColumnGroupView {
        self.shell.store.column_group_view()
    }

    pub fn load(&self) -> Result<usize, WidgetError> {
        self.shell.load()
    }

    /// Columns the host page can show, in display order of `ids`.
    pub fn active_columns(&self) -> Vec<Column> {
        let columns = self.columns.read().unwrap_or_else(PoisonError::into_inner);
        active_columns(&columns, &self.shell.store.state().displayed_column_ids)
    }

    /// Ids of the columns in a predefined group. The default group falls
    /// back to every column when no column names it.
    pub fn group_columns(&self, key: &str) -> Vec<String> {
        let columns = self.columns.read().unwrap_or_else(PoisonError::into_inner);
        let ids: Vec<String> = columns
            .iter()
            .filter(|c| c.belongs_to(key))
            .map(|c| c.id.clone())
            .collect();
        if ids.is_empty() && key == self.groups.default_group_key {
            return columns.iter().map(|c| c.id.clone()).collect();
        }
        ids
    }

    /// Replace the column metadata and derive the predefined group keys
    /// from it.
    ///
    /// A page that shows no columns yet starts out with the default group.
    pub fn set_columns(&self, columns: Vec<Column>) {
        let mut keys = vec![self.groups.default_group_key.clone()];
        for key in columns.iter().flat_map(|c| c.predefined_group_keys.iter()) {
            if *key != self.groups.custom_group_key && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        *self.columns.write().unwrap_or_else(PoisonError::into_inner) = columns;
        self.shell.store.set_group_keys(keys);

        let state = self.shell.store.state();
        if state.displayed_column_ids.is_empty() && state.current_preset.is_none() {
            let default_key = self.groups.default_group_key.clone();
            let ids = self.group_columns(&default_key);
            self.shell.store.select_group(default_key, ids);
        }
    }

    /// The host page changed its visible columns.
    ///
    /// Diverging from a predefined group switches the selection to the
    /// custom key in the same step.
    pub fn set_displayed_columns(&self, ids: Vec<String>) -> bool {
        let state = self.shell.store.state();
        let key = &state.selected_group_key;
        let predefined = state.group_keys.contains(key);
        let governed = state
            .current_preset
            .as_ref()
            .is_some_and(|p| p.has_columns() && columns_equal(&p.columns, &ids));

        if !state.edit_mode
            && !governed
            && predefined
            && !columns_equal(&self.group_columns(key), &ids)
        {
            return self
                .shell
                .store
                .select_group(self.groups.custom_group_key.clone(), ids);
        }
        self.shell.store.update_displayed_columns_ids(ids)
    }

    /// Select a predefined group, a column preset by name, or the custom key.
    pub fn select_group(&self, key: &str) -> Result<bool, WidgetError> {
        let state = self.shell.store.state();
        if state.edit_mode {
            return Err(WidgetError::EditMode);
        }
        if key == self.groups.custom_group_key || state.column_preset_named(key).is_some() {
            return Ok(self.shell.store.set_selected_group_key(key));
        }
        if state.group_keys.iter().any(|k| k == key) {
            let ids = self.group_columns(key);
            return Ok(self.shell.store.select_group(key, ids));
        }
        Err(WidgetError::NotFound(key.to_string()))
    }

    /// Save the visible columns as a new preset.
    pub fn save_new(&self) -> Result<SearchConfigInfo, WidgetError> {
        self.shell.create(false, true)
    }

    pub fn rename(&self, preset: &SearchConfigInfo) -> Result<SearchConfigInfo, WidgetError> {
        self.shell.rename(preset)
    }

    pub fn delete(&self, preset: &SearchConfigInfo) -> Result<(), WidgetError> {
        self.shell.delete(preset)
    }

    pub fn begin_edit(&self, preset: &SearchConfigInfo) -> Result<(), WidgetError> {
        self.shell.begin_edit(preset)
    }

    pub fn save_edit(&self) -> Result<SearchConfigInfo, WidgetError> {
        self.shell.save_edit()
    }

    /// Drop the edit. The restored columns reach the host page as a
    /// `SelectionChanged`.
    pub fn cancel_edit(&self) -> Result<(), WidgetError> {
        self.shell.cancel_edit().map(|_| ())
    }
}

impl<A, D, N> Drop for ColumnGroupWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    fn drop(&mut self) {
        self.shell.store.unwatch(self.watch);
    }
}
