//! In-memory topic for single-process pages and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Listener, SubscriptionHandle, Topic};

struct TopicState<T> {
    listeners: Vec<(SubscriptionHandle, Listener<T>)>,
    latest: Option<T>,
    published: usize,
}

/// In-memory broadcast topic.
///
/// Clone-friendly via `Arc`: every clone is another handle to the same
/// listeners and latest value.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use search_config_sync::topic::{InMemoryTopic, Topic};
///
/// let topic = InMemoryTopic::new();
/// topic.publish(1u32);
///
/// // Late subscribers see the latest value right away.
/// topic.subscribe(Arc::new(|value: &u32| assert_eq!(*value, 1)));
/// ```
pub struct InMemoryTopic<T> {
    state: Arc<Mutex<TopicState<T>>>,
    next_handle: Arc<AtomicU64>,
}

impl<T> Clone for InMemoryTopic<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            next_handle: Arc::clone(&self.next_handle),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for InMemoryTopic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> InMemoryTopic<T> {
    /// Create a new topic with no listeners and no latest value.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TopicState {
                listeners: Vec::new(),
                latest: None,
                published: 0,
            })),
            next_handle: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of values published so far.
    pub fn published_count(&self) -> usize {
        self.lock().published
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Share this topic as a trait object.
    pub fn shared(&self) -> Arc<dyn Topic<T>> {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, TopicState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + Sync + 'static> Topic<T> for InMemoryTopic<T> {
    fn publish(&self, value: T) {
        let listeners: Vec<Listener<T>> = {
            let mut state = self.lock();
            state.latest = Some(value.clone());
            state.published += 1;
            state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        for listener in listeners {
            listener(&value);
        }
    }

    fn subscribe(&self, listener: Listener<T>) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let latest = {
            let mut state = self.lock();
            state.listeners.push((handle, Arc::clone(&listener)));
            state.latest.clone()
        };

        if let Some(value) = latest {
            listener(&value);
        }
        handle
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(h, _)| *h != handle);
        state.listeners.len() != before
    }

    fn latest(&self) -> Option<T> {
        self.lock().latest.clone()
    }
}
