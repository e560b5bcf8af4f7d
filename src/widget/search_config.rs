use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::shell::Shell;
use super::{Dialog, HostContext, Notifier, OutputEvents, PresetSelected, WidgetError};
use crate::api::SearchConfigApi;
use crate::compare::{parse_field_values, FieldValue};
use crate::preset::{SearchConfigInfo, ViewMode};
use crate::store::{SearchConfigStore, SearchConfigView, SessionState};
use crate::topic::{Listener, SubscriptionHandle};

/// Saved filter values and view mode of a search page.
///
/// Raises [`PresetSelected`] whenever a preset becomes current, whether this
/// widget or a peer selected it, and after an edit was cancelled.
pub struct SearchConfigWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    shell: Shell<A, D, N>,
    watch: SubscriptionHandle,
}

impl<A, D, N> SearchConfigWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    pub fn new(store: SearchConfigStore, api: A, dialog: D, notifier: N, host: HostContext) -> Self {
        let shell = Shell::new("SEARCH_CONFIG", store, api, dialog, notifier, host);

        let events = shell.events.clone();
        let last: Mutex<Option<SearchConfigInfo>> = Mutex::new(None);
        let listener: Listener<SessionState> = Arc::new(move |state: &SessionState| {
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last == state.current_preset {
                return;
            }
            *last = state.current_preset.clone();
            if last.is_some() {
                events.preset_selected(state.page_data().into());
            }
        });
        let watch = shell.store.watch(listener);

        Self { shell, watch }
    }

    pub fn store(&self) -> &SearchConfigStore {
        &self.shell.store
    }

    pub fn host(&self) -> &HostContext {
        &self.shell.host
    }

    pub fn events(&self) -> &OutputEvents {
        &self.shell.events
    }

    pub fn on_preset_selected<F>(&self, listener: F)
    where
        F: Fn(PresetSelected) + Send + Sync + 'static,
    {
        self.shell.events.on_preset_selected(listener);
    }

    pub fn view(&self) -> SearchConfigView {
        self.shell.store.search_config_view()
    }

    /// Fetch the page's presets from the backend.
    pub fn load(&self) -> Result<usize, WidgetError> {
        self.shell.load()
    }

    /// The host page's filter inputs changed.
    pub fn set_field_values(&self, raw: &BTreeMap<String, FieldValue>) -> bool {
        self.shell.store.update_field_values(parse_field_values(raw))
    }

    pub fn set_displayed_columns(&self, ids: Vec<String>) -> bool {
        self.shell.store.update_displayed_columns_ids(ids)
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> bool {
        self.shell.store.update_view_mode(mode)
    }

    /// Select a preset, or clear the selection with `None`.
    pub fn select(&self, preset: Option<&SearchConfigInfo>) -> Result<bool, WidgetError> {
        if let Some(preset) = preset {
            if self.shell.store.state().preset(&preset.id).is_none() {
                return Err(WidgetError::NotFound(preset.id.clone()));
            }
        }
        if self.shell.store.is_edit_mode() {
            return Err(WidgetError::EditMode);
        }
        Ok(self.shell.store.set_current_config(preset.cloned()))
    }

    /// Save the live filter values as a new preset.
    pub fn save_new(&self) -> Result<SearchConfigInfo, WidgetError> {
        self.shell.create(true, false)
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

    /// Drop the edit and tell the host page to show the pre-edit inputs again.
    pub fn cancel_edit(&self) -> Result<(), WidgetError> {
        if let Some(revert) = self.shell.cancel_edit()? {
            debug!(store = %self.shell.store.identity(), ?revert, "edit cancelled");
            self.shell
                .events
                .preset_selected(self.shell.store.page_data().into());
        }
        Ok(())
    }
}

impl<A, D, N> Drop for SearchConfigWidget<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    fn drop(&mut self) {
        self.shell.store.unwatch(self.watch);
    }
}
