//! Column-group extension: keeps `selected_group_key` coupled to the
//! current preset.
//!
//! Rules, applied after every mutation of a store that has groups enabled:
//!
//! 1. A current, columns-bearing preset owns the key: key = preset name.
//! 2. Without a current preset the key is never a preset name.
//! 3. A key that is neither predefined, default, custom, nor the name of a
//!    columns-bearing preset falls back to the custom key.

use serde::{Deserialize, Serialize};

use super::state::SessionState;

pub const CUSTOM_GROUP_KEY: &str = "CUSTOM_GROUP";
pub const DEFAULT_GROUP_KEY: &str = "DEFAULT_GROUP";

/// Group keys a column-group store falls back to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupConfig {
    pub custom_group_key: String,
    pub default_group_key: String,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            custom_group_key: CUSTOM_GROUP_KEY.to_string(),
            default_group_key: DEFAULT_GROUP_KEY.to_string(),
        }
    }
}

impl GroupConfig {
    pub fn new(custom_group_key: impl Into<String>, default_group_key: impl Into<String>) -> Self {
        Self {
            custom_group_key: custom_group_key.into(),
            default_group_key: default_group_key.into(),
        }
    }

    fn is_fixed_key(&self, key: &str) -> bool {
        key == self.custom_group_key || key == self.default_group_key
    }
}

pub(crate) fn reconcile(state: &mut SessionState, config: &GroupConfig) {
    match &state.current_preset {
        Some(preset) if preset.has_columns() => {
            if state.selected_group_key != preset.name {
                state.selected_group_key = preset.name.clone();
            }
            return;
        }
        Some(_) => {}
        None => {
            let key = state.selected_group_key.as_str();
            let names_preset = state.all_presets.iter().any(|p| p.name == key);
            if names_preset && !is_predefined(state, config, key) {
                state.selected_group_key = config.custom_group_key.clone();
                return;
            }
        }
    }

    let key = state.selected_group_key.as_str();
    if !is_predefined(state, config, key) && state.column_preset_named(key).is_none() {
        state.selected_group_key = config.custom_group_key.clone();
    }
}

fn is_predefined(state: &SessionState, config: &GroupConfig, key: &str) -> bool {
    config.is_fixed_key(key) || state.group_keys.iter().any(|k| k == key)
}
