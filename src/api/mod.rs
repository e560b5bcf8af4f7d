//! Backend preset API contract.
//!
//! Presets are persisted by an external backend. Widgets talk to it through
//! `SearchConfigApi`; every call is a single-shot request that resolves to a
//! value or an `ApiError` and never panics.

mod in_memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::preset::{FieldValues, SearchConfigInfo};

pub use in_memory::InMemorySearchConfigApi;

/// A preset as stored by the backend, including its scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub id: String,
    pub app_id: String,
    pub product_name: String,
    pub page: String,
    pub name: String,
    #[serde(default)]
    pub field_list_version: u32,
    #[serde(default)]
    pub is_readonly: bool,
    #[serde(default)]
    pub is_advanced: bool,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: FieldValues,
}

impl SearchConfig {
    pub fn info(&self) -> SearchConfigInfo {
        SearchConfigInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            columns: self.columns.clone(),
            values: self.values.clone(),
            is_readonly: self.is_readonly,
            is_advanced: self.is_advanced,
        }
    }

    fn in_scope(&self, app_id: &str, product_name: &str, page: &str) -> bool {
        self.app_id == app_id && self.product_name == product_name && self.page == page
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchConfigRequest {
    pub app_id: String,
    pub product_name: String,
    pub page: String,
    pub name: String,
    pub field_list_version: u32,
    pub is_readonly: bool,
    pub is_advanced: bool,
    pub columns: Vec<String>,
    pub values: FieldValues,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchConfigResponse {
    pub id: String,
    /// All presets of the page after the create.
    pub configs: Vec<SearchConfigInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSearchConfigRequest {
    pub name: String,
    pub field_list_version: u32,
    pub is_readonly: bool,
    pub is_advanced: bool,
    pub columns: Vec<String>,
    pub values: FieldValues,
}

impl UpdateSearchConfigRequest {
    /// Request that stores `preset` as it is.
    pub fn from_info(preset: &SearchConfigInfo) -> Self {
        Self {
            name: preset.name.clone(),
            field_list_version: 0,
            is_readonly: preset.is_readonly,
            is_advanced: preset.is_advanced,
            columns: preset.columns.clone(),
            values: preset.values.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSearchConfigResponse {
    pub configs: Vec<SearchConfigInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchConfigResponse {
    pub config: SearchConfig,
}

/// Error type for backend calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No preset with this id.
    NotFound(String),
    /// A preset with this name already exists on the page.
    Conflict { name: String },
    /// The backend refused the request (validation, readonly preset).
    Rejected(String),
    /// The backend could not be reached.
    Unavailable(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(id) => write!(f, "search config not found: {}", id),
            ApiError::Conflict { name } => {
                write!(f, "search config named {} already exists", name)
            }
            ApiError::Rejected(msg) => write!(f, "request rejected: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "backend unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Client for the preset backend.
pub trait SearchConfigApi: Send + Sync {
    /// All presets of one page.
    fn list(
        &self,
        app_id: &str,
        page: &str,
        product_name: &str,
    ) -> Result<Vec<SearchConfigInfo>, ApiError>;

    fn create(
        &self,
        request: CreateSearchConfigRequest,
    ) -> Result<CreateSearchConfigResponse, ApiError>;

    fn update(
        &self,
        id: &str,
        request: UpdateSearchConfigRequest,
    ) -> Result<UpdateSearchConfigResponse, ApiError>;

    fn get(&self, id: &str) -> Result<GetSearchConfigResponse, ApiError>;

    fn delete(&self, id: &str) -> Result<(), ApiError>;
}
