//! Cross-instance topic - typed publish/subscribe for store synchronization.
//!
//! Every store on a page publishes its state diffs to one topic and listens
//! to the same topic for the diffs of its peers. Topics are plain values
//! injected into stores; there is no process-wide instance, so tests and
//! hosts can run as many isolated topics as they like.
//!
//! ## Delivery
//!
//! ```text
//!   store A ──publish──▶ ┌──────────────┐ ──▶ listener A (drops own echo)
//!                        │ InMemoryTopic│ ──▶ listener B (applies diff)
//!   store B ──publish──▶ └──────────────┘ ──▶ listener C (applies diff)
//! ```
//!
//! Delivery is synchronous and in publish order. A listener that subscribes
//! late receives the most recently published value once, immediately.

mod in_memory;
mod message;
#[cfg(feature = "bus")]
mod relay;

use std::sync::Arc;

pub use in_memory::InMemoryTopic;
pub use message::{TopicMessage, TopicPayload};
#[cfg(feature = "bus")]
pub use relay::TopicRelay;

/// Callback invoked for every value published on a topic.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Opaque handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub(crate) u64);

/// A broadcast channel of values of type `T`.
pub trait Topic<T>: Send + Sync {
    /// Deliver `value` to every current listener and remember it as latest.
    fn publish(&self, value: T);

    /// Register a listener. The latest value, if any, is replayed to it.
    fn subscribe(&self, listener: Listener<T>) -> SubscriptionHandle;

    /// Remove a listener. Returns `false` if the handle was unknown.
    fn unsubscribe(&self, handle: SubscriptionHandle) -> bool;

    /// The most recently published value.
    fn latest(&self) -> Option<T>;
}

/// The topic type stores synchronize over.
pub type PageTopic = dyn Topic<TopicMessage>;
