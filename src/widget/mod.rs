//! Widget shells.
//!
//! A shell binds user actions of one mounted widget to its store, talks to
//! the backend and reports outcomes through the host's dialog and notifier.
//! Shells never mutate the session before the backend answered, so a failed
//! call leaves the store exactly as it was.

mod column_group;
mod error;
mod events;
mod search_config;
mod shell;

use serde::{Deserialize, Serialize};

pub use column_group::ColumnGroupWidget;
pub use error::WidgetError;
pub use events::{OutputEvents, PresetSelected, SelectionChanged};
pub use search_config::SearchConfigWidget;

/// What the embedding application tells a widget about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostContext {
    pub app_id: String,
    pub product_name: String,
    pub base_url: String,
    pub locale: String,
    /// Granted permissions. Shells only use them to decide which actions
    /// to offer; the backend enforces them.
    pub permissions: Vec<String>,
}

impl HostContext {
    pub fn new(app_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            product_name: product_name.into(),
            locale: "en".into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Prefix for backend-for-frontend requests.
    pub fn api_prefix(&self) -> String {
        format!("{}/bff", self.base_url.trim_end_matches('/'))
    }
}

/// Contents of a save, rename or delete-confirmation dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogContent {
    pub title_key: String,
    /// Prefilled preset name. Empty for a confirmation.
    pub name: String,
    pub save_input_values: bool,
    pub save_columns: bool,
}

impl DialogContent {
    pub fn confirm(title_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title_key: title_key.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogButton {
    #[default]
    Primary,
    Secondary,
}

/// What the user entered in a dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogOutput {
    pub name: String,
    pub save_input_values: bool,
    pub save_columns: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogResult {
    pub button: DialogButton,
    pub result: Option<DialogOutput>,
}

impl DialogResult {
    pub fn confirmed(output: DialogOutput) -> Self {
        Self {
            button: DialogButton::Primary,
            result: Some(output),
        }
    }

    pub fn dismissed() -> Self {
        Self {
            button: DialogButton::Secondary,
            result: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.button == DialogButton::Primary
    }
}

/// Modal dialogs shown by the host. Blocks until the user answered.
pub trait Dialog: Send + Sync {
    fn open(&self, content: DialogContent) -> DialogResult;
}

/// Toast-style notifications. Keys are translation keys.
pub trait Notifier: Send + Sync {
    fn success(&self, key: &str);
    fn error(&self, key: &str);
}
