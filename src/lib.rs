//! Reactive preset stores for search pages.
//!
//! Users save named presets of a search page (filter values, visible
//! columns, view mode) and pick them again later. Every widget instance on a
//! page owns a [`SearchConfigStore`]; stores on the same page stay in sync by
//! exchanging state diffs over an injected [`Topic`](topic::Topic).

pub mod api;
#[cfg(feature = "bus")]
pub mod bus;
pub mod compare;
pub mod preset;
pub mod store;
pub mod topic;
#[cfg(feature = "widgets")]
pub mod widget;

pub use api::{ApiError, InMemorySearchConfigApi, SearchConfigApi};
pub use compare::{columns_equal, parse_field_values, values_equal, FieldValue};
pub use preset::{Column, FieldValues, PresetKind, SearchConfigInfo, ViewMode};
pub use store::{
    GroupConfig, PageData, Revert, SearchConfigStore, SessionState, StoreConfig, SyncStats,
};
pub use topic::{InMemoryTopic, Topic, TopicMessage, TopicPayload};

#[cfg(feature = "bus")]
pub use topic::TopicRelay;
#[cfg(feature = "widgets")]
pub use widget::{ColumnGroupWidget, HostContext, SearchConfigWidget, WidgetError};

// Re-export the EventEmitter widget output events are delivered through
#[cfg(feature = "widgets")]
pub use event_emitter_rs::EventEmitter;
