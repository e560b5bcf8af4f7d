//! Reactive state store - one per mounted widget.
//!
//! A `SearchConfigStore` owns the session of one widget instance, applies
//! update operations, derives memoized view models and keeps its peers on the
//! same page topic eventually consistent.
//!
//! ## Example
//!
//! ```
//! use search_config_sync::preset::SearchConfigInfo;
//! use search_config_sync::store::{SearchConfigStore, StoreConfig};
//! use search_config_sync::topic::InMemoryTopic;
//!
//! let topic = InMemoryTopic::new();
//! let left = SearchConfigStore::new(StoreConfig::new("tickets"), topic.shared());
//! let right = SearchConfigStore::new(StoreConfig::new("tickets"), topic.shared());
//!
//! let open = SearchConfigInfo::new("1", "open").with_value("status", "open");
//! left.set_search_configs(vec![open.clone()]);
//! left.set_current_config(Some(open.clone()));
//!
//! assert_eq!(right.current_preset(), Some(open));
//! ```
//!
//! Every operation is a no-op when it would not change an observable field:
//! the state is not replaced, nothing is published and selectors keep their
//! cached values.

mod edit;
mod group;
mod selectors;
mod state;
mod sync;
mod updaters;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::preset::SearchConfigInfo;
use crate::topic::{InMemoryTopic, Listener, PageTopic, SubscriptionHandle, Topic, TopicMessage, TopicPayload};

pub use group::{GroupConfig, CUSTOM_GROUP_KEY, DEFAULT_GROUP_KEY};
pub use selectors::{ColumnGroupView, EditModeView, PresetLists, SearchConfigView, SelectorStats};
pub use state::{EditSnapshot, PageData, Revert, SessionState};

use selectors::Selectors;

/// Store construction options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    pub page_name: String,
    /// Enables the column-group extension.
    pub group: Option<GroupConfig>,
}

impl StoreConfig {
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            group: None,
        }
    }

    pub fn with_groups(mut self, group: GroupConfig) -> Self {
        self.group = Some(group);
        self
    }
}

/// Counters for topic traffic of one store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub published: usize,
    pub applied: usize,
    pub echoes_ignored: usize,
}

#[derive(Default)]
struct SyncCounters {
    published: AtomicUsize,
    applied: AtomicUsize,
    echoes_ignored: AtomicUsize,
}

struct StoreInner {
    identity: String,
    config: StoreConfig,
    state: RwLock<SessionState>,
    revision: AtomicU64,
    topic: Arc<PageTopic>,
    subscription: Mutex<Option<SubscriptionHandle>>,
    watchers: InMemoryTopic<SessionState>,
    selectors: Mutex<Selectors>,
    counters: SyncCounters,
}

impl StoreInner {
    /// Hand edit mode back to the page if this store owns it.
    fn release_edit(&self) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if !state.edit_mode || state.in_charge_of_edit != self.identity {
                return;
            }
            state.edit_mode = false;
            state.in_charge_of_edit.clear();
            state.pre_edit = None;
        }
        self.counters.published.fetch_add(1, Ordering::SeqCst);
        debug!(store = %self.identity, "releasing edit mode");
        self.topic.publish(TopicMessage::new(
            self.identity.clone(),
            TopicPayload::EditMode {
                edit_mode: false,
                in_charge_of_edit: String::new(),
            },
        ));
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        self.release_edit();
        let handle = self
            .subscription
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            self.topic.unsubscribe(handle);
        }
    }
}

/// Handle to a store. Clones share the same session.
#[derive(Clone)]
pub struct SearchConfigStore {
    inner: Arc<StoreInner>,
}

impl SearchConfigStore {
    /// Create a store subscribed to `topic`.
    ///
    /// The store gets a fresh identity. If the topic already carries a
    /// message from a peer, it is applied before `new` returns.
    pub fn new(config: StoreConfig, topic: Arc<PageTopic>) -> Self {
        let selected_group_key = config
            .group
            .as_ref()
            .map(|g| g.default_group_key.clone())
            .unwrap_or_default();
        let initial = SessionState::new(config.page_name.clone(), selected_group_key);

        let watchers = InMemoryTopic::new();
        watchers.publish(initial.clone());

        let store = Self {
            inner: Arc::new(StoreInner {
                identity: uuid::Uuid::new_v4().to_string(),
                config,
                state: RwLock::new(initial),
                revision: AtomicU64::new(0),
                topic,
                subscription: Mutex::new(None),
                watchers,
                selectors: Mutex::new(Selectors::default()),
                counters: SyncCounters::default(),
            }),
        };

        let weak = Arc::downgrade(&store.inner);
        let listener: Listener<TopicMessage> = Arc::new(move |message: &TopicMessage| {
            if let Some(inner) = weak.upgrade() {
                SearchConfigStore { inner }.store_update(message);
            }
        });
        let handle = store.inner.topic.subscribe(listener);
        *store.lock_subscription() = Some(handle);

        debug!(store = %store.identity(), page = %store.inner.config.page_name, "store created");
        store
    }

    pub fn identity(&self) -> &str {
        &self.inner.identity
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Incremented every time the session state is replaced.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn sync_stats(&self) -> SyncStats {
        let counters = &self.inner.counters;
        SyncStats {
            published: counters.published.load(Ordering::SeqCst),
            applied: counters.applied.load(Ordering::SeqCst),
            echoes_ignored: counters.echoes_ignored.load(Ordering::SeqCst),
        }
    }

    /// Copy of the whole session.
    pub fn state(&self) -> SessionState {
        self.read_state().clone()
    }

    pub fn current_preset(&self) -> Option<SearchConfigInfo> {
        self.read_state().current_preset.clone()
    }

    pub fn all_presets(&self) -> Vec<SearchConfigInfo> {
        self.read_state().all_presets.clone()
    }

    pub fn selected_group_key(&self) -> String {
        self.read_state().selected_group_key.clone()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.read_state().edit_mode
    }

    /// Push every committed session state to `listener`, starting with the
    /// current one.
    pub fn watch(&self, listener: Listener<SessionState>) -> SubscriptionHandle {
        self.inner.watchers.subscribe(listener)
    }

    pub fn unwatch(&self, handle: SubscriptionHandle) -> bool {
        self.inner.watchers.unsubscribe(handle)
    }

    /// Stop listening to the page topic. Further peer messages are not applied.
    ///
    /// A store that owns edit mode announces the end of the edit first.
    pub fn destroy(&self) {
        self.inner.release_edit();
        if let Some(handle) = self.lock_subscription().take() {
            self.inner.topic.unsubscribe(handle);
            debug!(store = %self.identity(), "store detached from topic");
        }
    }

    pub fn preset_lists(&self) -> PresetLists {
        let state = self.read_state();
        self.lock_selectors().preset_lists(&state)
    }

    /// Predefined keys, column preset names and the selected key, deduplicated.
    pub fn all_group_keys(&self) -> Vec<String> {
        let state = self.read_state();
        self.lock_selectors().all_group_keys(&state)
    }

    pub fn page_data(&self) -> PageData {
        let state = self.read_state();
        self.lock_selectors().page_data(&state)
    }

    pub fn edit_mode_view(&self) -> EditModeView {
        let state = self.read_state();
        self.lock_selectors().edit_mode(&state, &self.inner.identity)
    }

    pub fn search_config_view(&self) -> SearchConfigView {
        let state = self.read_state();
        let mut selectors = self.lock_selectors();
        SearchConfigView {
            current_preset: state.current_preset.clone(),
            presets: selectors.preset_lists(&state).with_values,
            edit: selectors.edit_mode(&state, &self.inner.identity),
        }
    }

    pub fn column_group_view(&self) -> ColumnGroupView {
        let state = self.read_state();
        let mut selectors = self.lock_selectors();
        ColumnGroupView {
            selected_group_key: state.selected_group_key.clone(),
            all_group_keys: selectors.all_group_keys(&state),
            current_preset: state.current_preset.clone(),
            edit: selectors.edit_mode(&state, &self.inner.identity),
        }
    }

    pub fn selector_stats(&self) -> SelectorStats {
        self.lock_selectors().stats()
    }

    /// Apply `f` to a copy of the session and commit it if anything changed.
    ///
    /// Group rules are enforced before comparing. Returns the committed state,
    /// or `None` for a no-op.
    pub(crate) fn mutate<F>(&self, op: &'static str, f: F) -> Option<SessionState>
    where
        F: FnOnce(&mut SessionState),
    {
        let committed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = guard.clone();
            f(&mut next);
            if let Some(group) = &self.inner.config.group {
                group::reconcile(&mut next, group);
            }
            if next == *guard {
                return None;
            }
            *guard = next.clone();
            next
        };

        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(store = %self.identity(), op, revision, "state committed");
        self.inner.watchers.publish(committed.clone());
        Some(committed)
    }

    pub(crate) fn publish(&self, payload: TopicPayload) {
        self.inner.counters.published.fetch_add(1, Ordering::SeqCst);
        debug!(store = %self.identity(), message = payload.name(), "publishing");
        self.inner
            .topic
            .publish(TopicMessage::new(self.inner.identity.clone(), payload));
    }

    pub(crate) fn group_config(&self) -> Option<&GroupConfig> {
        self.inner.config.group.as_ref()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_selectors(&self) -> MutexGuard<'_, Selectors> {
        self.inner
            .selectors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscription(&self) -> MutexGuard<'_, Option<SubscriptionHandle>> {
        self.inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SearchConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfigStore")
            .field("identity", &self.inner.identity)
            .field("revision", &self.revision())
            .finish()
    }
}
