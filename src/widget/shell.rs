//! Backend round trips shared by both widgets.

use tracing::{debug, warn};

use super::{Dialog, DialogContent, DialogOutput, HostContext, Notifier, OutputEvents, WidgetError};
use crate::api::{CreateSearchConfigRequest, SearchConfigApi, UpdateSearchConfigRequest};
use crate::preset::{FieldValues, SearchConfigInfo, ViewMode};
use crate::store::{Revert, SearchConfigStore};

pub(crate) struct Shell<A, D, N> {
    pub(crate) store: SearchConfigStore,
    pub(crate) api: A,
    pub(crate) dialog: D,
    pub(crate) notifier: N,
    pub(crate) host: HostContext,
    pub(crate) events: OutputEvents,
    /// Notification key namespace, e.g. `SEARCH_CONFIG`.
    scope: &'static str,
}

impl<A, D, N> Shell<A, D, N>
where
    A: SearchConfigApi,
    D: Dialog,
    N: Notifier,
{
    pub(crate) fn new(
        scope: &'static str,
        store: SearchConfigStore,
        api: A,
        dialog: D,
        notifier: N,
        host: HostContext,
    ) -> Self {
        Self {
            store,
            api,
            dialog,
            notifier,
            host,
            events: OutputEvents::new(),
            scope,
        }
    }

    pub(crate) fn key(&self, action: &str, outcome: &str) -> String {
        format!("{}.{}.{}", self.scope, action, outcome)
    }

    /// Report a failed action. Backend failures are shown to the user.
    fn fail(&self, action: &str, err: WidgetError) -> WidgetError {
        if let WidgetError::Api(api_err) = &err {
            warn!(
                store = %self.store.identity(),
                action,
                error = %api_err,
                "search config request failed"
            );
            self.notifier.error(&self.key(action, "ERROR"));
        }
        err
    }

    fn succeed(&self, action: &str) {
        self.notifier.success(&self.key(action, "SUCCESS"));
    }

    /// Look up `preset` in the store, refusing readonly ones.
    fn writable(&self, preset: &SearchConfigInfo) -> Result<SearchConfigInfo, WidgetError> {
        let stored = self
            .store
            .state()
            .preset(&preset.id)
            .cloned()
            .ok_or_else(|| WidgetError::NotFound(preset.id.clone()))?;
        if stored.is_readonly {
            return Err(WidgetError::Readonly(stored.id));
        }
        Ok(stored)
    }

    fn ask(&self, content: DialogContent) -> Result<DialogOutput, WidgetError> {
        let answer = self.dialog.open(content);
        if !answer.is_confirmed() {
            return Err(WidgetError::Cancelled);
        }
        Ok(answer.result.unwrap_or_default())
    }

    /// Fetch the page's presets and replace the store's list.
    pub(crate) fn load(&self) -> Result<usize, WidgetError> {
        let page = self.store.state().page_name;
        let configs = self
            .api
            .list(&self.host.app_id, &page, &self.host.product_name)
            .map_err(|err| self.fail("LOAD", err.into()))?;
        let count = configs.len();
        self.store.set_search_configs(configs);
        debug!(store = %self.store.identity(), count, "presets loaded");
        Ok(count)
    }

    /// Ask for a name and store the live session as a new preset, which then
    /// becomes current.
    pub(crate) fn create(
        &self,
        save_input_values: bool,
        save_columns: bool,
    ) -> Result<SearchConfigInfo, WidgetError> {
        if self.store.is_edit_mode() {
            return Err(WidgetError::EditMode);
        }
        let output = self.ask(DialogContent {
            title_key: self.key("CREATE", "TITLE"),
            name: String::new(),
            save_input_values,
            save_columns,
        })?;
        if !output.save_input_values && !output.save_columns {
            return Err(WidgetError::Cancelled);
        }

        let state = self.store.state();
        let values: FieldValues = if output.save_input_values {
            state.current_field_values.clone()
        } else {
            FieldValues::new()
        };
        let columns = if output.save_columns {
            state.displayed_column_ids.clone()
        } else {
            Vec::new()
        };
        let request = CreateSearchConfigRequest {
            app_id: self.host.app_id.clone(),
            product_name: self.host.product_name.clone(),
            page: state.page_name.clone(),
            name: output.name,
            field_list_version: 0,
            is_readonly: false,
            is_advanced: output.save_input_values && state.view_mode == ViewMode::Advanced,
            columns,
            values,
        };

        let response = self
            .api
            .create(request)
            .map_err(|err| self.fail("CREATE", err.into()))?;
        let Some(created) = response.configs.iter().find(|c| c.id == response.id).cloned() else {
            // Saved, but the response does not say which entry is new.
            warn!(
                store = %self.store.identity(),
                id = %response.id,
                "created preset missing from the backend response"
            );
            self.store.set_search_configs(response.configs);
            self.notifier.error(&self.key("CREATE", "ERROR"));
            return Err(WidgetError::NotFound(response.id));
        };

        self.store.add_search_config(created.clone());
        self.store.set_current_config(Some(created.clone()));
        self.succeed("CREATE");
        Ok(created)
    }

    /// Ask for a new name and store it.
    pub(crate) fn rename(&self, preset: &SearchConfigInfo) -> Result<SearchConfigInfo, WidgetError> {
        let stored = self.writable(preset)?;
        let output = self.ask(DialogContent {
            title_key: self.key("RENAME", "TITLE"),
            name: stored.name.clone(),
            save_input_values: stored.has_values(),
            save_columns: stored.has_columns(),
        })?;
        if output.name == stored.name {
            return Ok(stored);
        }

        let mut request = UpdateSearchConfigRequest::from_info(&stored);
        request.name = output.name;
        let response = self
            .api
            .update(&stored.id, request)
            .map_err(|err| self.fail("RENAME", err.into()))?;
        let renamed = response
            .configs
            .into_iter()
            .find(|c| c.id == stored.id)
            .ok_or_else(|| WidgetError::NotFound(stored.id.clone()))?;

        self.store.add_search_config(renamed.clone());
        self.succeed("RENAME");
        Ok(renamed)
    }

    /// Confirm, then delete `preset` from the backend and the store.
    pub(crate) fn delete(&self, preset: &SearchConfigInfo) -> Result<(), WidgetError> {
        let stored = self.writable(preset)?;
        if self.store.is_edit_mode() {
            return Err(WidgetError::EditMode);
        }
        self.ask(DialogContent::confirm(self.key("DELETE", "TITLE"), stored.name.clone()))?;

        self.api
            .delete(&stored.id)
            .map_err(|err| self.fail("DELETE", err.into()))?;
        self.store.delete_search_config(&stored);
        self.succeed("DELETE");
        Ok(())
    }

    pub(crate) fn begin_edit(&self, preset: &SearchConfigInfo) -> Result<(), WidgetError> {
        let stored = self.writable(preset)?;
        if !self.store.enter_edit_mode(&stored) {
            return Err(WidgetError::EditMode);
        }
        Ok(())
    }

    /// Store the live session into the preset being edited.
    pub(crate) fn save_edit(&self) -> Result<SearchConfigInfo, WidgetError> {
        let view = self.store.edit_mode_view();
        if !view.edit_mode || !view.is_in_charge_of_edit {
            return Err(WidgetError::EditMode);
        }
        let state = self.store.state();
        let editing = state.current_preset.clone().ok_or(WidgetError::EditMode)?;

        let mut updated = editing.clone();
        if editing.has_values() {
            updated.values = state.current_field_values.clone();
            updated.is_advanced = state.view_mode == ViewMode::Advanced;
        }
        if editing.has_columns() {
            updated.columns = state.displayed_column_ids.clone();
        }

        let response = self
            .api
            .update(&editing.id, UpdateSearchConfigRequest::from_info(&updated))
            .map_err(|err| self.fail("EDIT", err.into()))?;
        let saved = response
            .configs
            .into_iter()
            .find(|c| c.id == editing.id)
            .unwrap_or(updated);

        self.store.save_edit(saved.clone());
        self.succeed("EDIT");
        Ok(saved)
    }

    pub(crate) fn cancel_edit(&self) -> Result<Option<Revert>, WidgetError> {
        if !self.store.cancel_edit() {
            return Err(WidgetError::EditMode);
        }
        Ok(self.store.take_revert())
    }
}
