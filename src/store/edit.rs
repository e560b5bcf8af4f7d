//! Edit mode: enter, cancel, save.
//!
//! Only one store on a page owns edit mode at a time. Ownership is announced
//! on the topic; peers mirror `edit_mode` but never show edit affordances
//! because their identity is not `in_charge_of_edit`.

use super::state::{Revert, SessionState};
use super::SearchConfigStore;
use crate::preset::SearchConfigInfo;
use crate::topic::TopicPayload;

impl SearchConfigStore {
    /// Start editing `preset`.
    ///
    /// Ignored when any store is already editing, or when the preset is
    /// readonly or unknown. The current session is snapshotted so
    /// `cancel_edit` can restore it.
    pub fn enter_edit_mode(&self, preset: &SearchConfigInfo) -> bool {
        if preset.is_readonly {
            return false;
        }
        let identity = self.identity().to_string();
        let committed = self.mutate("enter_edit_mode", |s| {
            if s.edit_mode {
                return;
            }
            let Some(stored) = s.preset(&preset.id).cloned() else {
                return;
            };
            if stored.is_readonly {
                return;
            }
            s.pre_edit = Some(s.snapshot());
            s.revert = None;
            s.edit_mode = true;
            s.in_charge_of_edit = identity.clone();
            s.activate(stored);
        });

        let Some(state) = committed else {
            return false;
        };
        self.publish(TopicPayload::Change {
            config: state.current_preset,
        });
        self.publish(TopicPayload::EditMode {
            edit_mode: true,
            in_charge_of_edit: identity,
        });
        true
    }

    /// Leave edit mode without saving and restore the pre-edit session.
    ///
    /// Sets `revert` so the owning widget can repaint the host page. Only the
    /// store in charge of the edit can cancel it.
    pub fn cancel_edit(&self) -> bool {
        let before = self.state();
        if !self.owns_edit(&before) {
            return false;
        }
        let committed = self.mutate("cancel_edit", |s| {
            let snapshot = s.pre_edit.take();
            s.edit_mode = false;
            s.in_charge_of_edit.clear();

            if let Some(snapshot) = snapshot {
                s.current_field_values = snapshot.current_field_values;
                s.displayed_column_ids = snapshot.displayed_column_ids;
                s.view_mode = snapshot.view_mode;
                s.selected_group_key = snapshot.selected_group_key;
                let restored = snapshot
                    .current_preset
                    .and_then(|p| s.preset(&p.id).cloned());
                s.current_preset = restored;
                s.refresh_current();
            }

            let revert = match s.current_preset.clone() {
                Some(preset) => Revert::Preset(preset),
                None => Revert::PageData(s.page_data()),
            };
            s.revert = Some(revert);
        });

        let Some(after) = committed else {
            return false;
        };
        self.publish(TopicPayload::EditMode {
            edit_mode: false,
            in_charge_of_edit: String::new(),
        });
        self.publish_restored(&before, &after);
        true
    }

    /// Leave edit mode, storing `updated` and making it current.
    pub fn save_edit(&self, updated: SearchConfigInfo) -> bool {
        if !self.owns_edit(&self.state()) {
            return false;
        }
        let committed = self.mutate("save_edit", |s| {
            s.edit_mode = false;
            s.in_charge_of_edit.clear();
            s.pre_edit = None;
            s.revert = None;
            s.upsert_preset(updated.clone());
            s.activate(updated.clone());
        });

        if committed.is_none() {
            return false;
        }
        self.publish(TopicPayload::EditMode {
            edit_mode: false,
            in_charge_of_edit: String::new(),
        });
        self.publish(TopicPayload::Edit {
            config: updated.clone(),
        });
        self.publish(TopicPayload::Change {
            config: Some(updated),
        });
        true
    }

    /// Take the revert signal produced by the last `cancel_edit`.
    pub fn take_revert(&self) -> Option<Revert> {
        let mut taken = None;
        self.mutate("take_revert", |s| taken = s.revert.take());
        taken
    }

    /// Mirror a peer's edit-mode announcement.
    pub(crate) fn apply_edit_mode(&self, edit_mode: bool, in_charge_of_edit: String) -> bool {
        let identity = self.identity().to_string();
        self.mutate("apply_edit_mode", |s| {
            if s.in_charge_of_edit == identity && in_charge_of_edit != identity {
                // Ownership moved to a peer.
                s.pre_edit = None;
            }
            s.edit_mode = edit_mode;
            s.in_charge_of_edit = if edit_mode {
                in_charge_of_edit
            } else {
                String::new()
            };
        })
        .is_some()
    }

    fn owns_edit(&self, state: &SessionState) -> bool {
        state.edit_mode && state.in_charge_of_edit == self.identity()
    }

    fn publish_restored(&self, before: &SessionState, after: &SessionState) {
        if before.current_preset != after.current_preset {
            self.publish(TopicPayload::Change {
                config: after.current_preset.clone(),
            });
        }
        if before.current_field_values != after.current_field_values {
            self.publish(TopicPayload::FieldValues {
                values: after.current_field_values.clone(),
            });
        }
        if before.displayed_column_ids != after.displayed_column_ids {
            self.publish(TopicPayload::DisplayedColumns {
                column_ids: after.displayed_column_ids.clone(),
            });
        }
        if before.view_mode != after.view_mode {
            self.publish(TopicPayload::ViewMode {
                view_mode: after.view_mode,
            });
        }
        if before.selected_group_key != after.selected_group_key {
            self.publish(TopicPayload::SelectedGroupKey {
                key: after.selected_group_key.clone(),
            });
        }
    }
}
