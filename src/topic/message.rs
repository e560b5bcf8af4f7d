//! Messages exchanged by stores over a page topic.

use serde::{Deserialize, Serialize};

use crate::preset::{FieldValues, SearchConfigInfo, ViewMode};

/// A state diff tagged with the identity of the store that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessage {
    pub store_identity: String,
    pub payload: TopicPayload,
}

impl TopicMessage {
    pub fn new(store_identity: impl Into<String>, payload: TopicPayload) -> Self {
        Self {
            store_identity: store_identity.into(),
            payload,
        }
    }

    pub fn name(&self) -> &'static str {
        self.payload.name()
    }

    /// Whether this message was published by the store with `identity`.
    pub fn is_from(&self, identity: &str) -> bool {
        self.store_identity == identity
    }
}

/// Operation-specific part of a topic message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TopicPayload {
    /// Full replacement of the preset list.
    SearchConfigs { configs: Vec<SearchConfigInfo> },
    /// The current preset changed (or was cleared).
    Change { config: Option<SearchConfigInfo> },
    Delete { config: SearchConfigInfo },
    Add { config: SearchConfigInfo },
    FieldValues { values: FieldValues },
    DisplayedColumns { column_ids: Vec<String> },
    ViewMode { view_mode: ViewMode },
    /// The column-group selection moved to a key no preset owns.
    SelectedGroupKey { key: String },
    /// Edit ownership changed. An empty `in_charge_of_edit` means nobody edits.
    EditMode {
        edit_mode: bool,
        in_charge_of_edit: String,
    },
    /// A preset was saved from edit mode.
    Edit { config: SearchConfigInfo },
}

impl TopicPayload {
    pub fn name(&self) -> &'static str {
        match self {
            TopicPayload::SearchConfigs { .. } => "searchConfigs",
            TopicPayload::Change { .. } => "change",
            TopicPayload::Delete { .. } => "delete",
            TopicPayload::Add { .. } => "add",
            TopicPayload::FieldValues { .. } => "fieldValues",
            TopicPayload::DisplayedColumns { .. } => "displayedColumns",
            TopicPayload::ViewMode { .. } => "viewMode",
            TopicPayload::SelectedGroupKey { .. } => "selectedGroupKey",
            TopicPayload::EditMode { .. } => "editMode",
            TopicPayload::Edit { .. } => "edit",
        }
    }
}
