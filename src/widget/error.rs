use std::fmt;

use crate::api::ApiError;

/// Why a widget action did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The backend call failed. The session is unchanged.
    Api(ApiError),
    /// The user dismissed the dialog.
    Cancelled,
    /// The preset is readonly.
    Readonly(String),
    /// The preset is not known to the store.
    NotFound(String),
    /// Another edit is in progress, or this widget does not own it.
    EditMode,
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Api(err) => write!(f, "backend error: {}", err),
            WidgetError::Cancelled => write!(f, "cancelled by user"),
            WidgetError::Readonly(id) => write!(f, "search config {} is readonly", id),
            WidgetError::NotFound(id) => write!(f, "search config not found: {}", id),
            WidgetError::EditMode => write!(f, "edit mode not available"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for WidgetError {
    fn from(err: ApiError) -> Self {
        WidgetError::Api(err)
    }
}
