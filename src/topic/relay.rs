//! Bridge between a local page topic and a bus.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{PageTopic, SubscriptionHandle, TopicMessage};
use crate::bus::{Envelope, PublishError, Publisher, Subscriber};

/// Forwards every message of a local topic to a bus and injects messages
/// arriving from the bus into the local topic.
///
/// Envelopes carry the relay's `origin` so a relay never re-injects what it
/// published itself, and messages it injects are not forwarded back out.
///
/// ## Example
///
/// ```
/// use search_config_sync::bus::InMemoryQueue;
/// use search_config_sync::topic::{InMemoryTopic, TopicRelay};
///
/// let queue = InMemoryQueue::new();
/// let left = InMemoryTopic::new();
/// let right = InMemoryTopic::new();
///
/// let relay_left = TopicRelay::new(left.shared(), queue.clone(), queue.new_subscriber());
/// let relay_right = TopicRelay::new(right.shared(), queue.clone(), queue.new_subscriber());
///
/// // ... stores publish on `left` ...
/// relay_right.pump(0).unwrap();
/// # let _ = relay_left;
/// ```
pub struct TopicRelay<P: Publisher, S: Subscriber> {
    origin: String,
    topic: Arc<PageTopic>,
    subscriber: S,
    injecting: Arc<AtomicBool>,
    forwarded: Arc<AtomicUsize>,
    handle: SubscriptionHandle,
    _publisher: Arc<P>,
}

impl<P: Publisher + 'static, S: Subscriber> TopicRelay<P, S> {
    /// Attach a relay to `topic`. The topic's latest message, if any, is
    /// forwarded right away.
    pub fn new(topic: Arc<PageTopic>, publisher: P, subscriber: S) -> Self {
        let origin = uuid::Uuid::new_v4().to_string();
        let publisher = Arc::new(publisher);
        let injecting = Arc::new(AtomicBool::new(false));
        let forwarded = Arc::new(AtomicUsize::new(0));

        let listener = {
            let origin = origin.clone();
            let publisher = Arc::clone(&publisher);
            let injecting = Arc::clone(&injecting);
            let forwarded = Arc::clone(&forwarded);
            Arc::new(move |message: &TopicMessage| {
                if injecting.load(Ordering::SeqCst) {
                    return;
                }
                match forward(publisher.as_ref(), &origin, message) {
                    Ok(()) => {
                        forwarded.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(err) => warn!(message = message.name(), %err, "relay failed to forward"),
                }
            })
        };
        let handle = topic.subscribe(listener);

        Self {
            origin,
            topic,
            subscriber,
            injecting,
            forwarded,
            handle,
            _publisher: publisher,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of local messages put on the bus so far.
    pub fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::SeqCst)
    }

    /// Drain the bus into the local topic.
    ///
    /// Waits up to `timeout_ms` for the first envelope, then takes whatever is
    /// immediately available. Returns the number of messages injected.
    /// Envelopes that fail to decode are skipped.
    pub fn pump(&self, timeout_ms: u64) -> Result<usize, PublishError> {
        let mut injected = 0;
        let mut next = self.subscriber.poll(timeout_ms)?;

        while let Some(envelope) = next {
            if envelope.origin != self.origin {
                match envelope.decode::<TopicMessage>() {
                    Ok(message) => {
                        debug!(message = message.name(), from = %envelope.origin, "relay injecting");
                        self.injecting.store(true, Ordering::SeqCst);
                        self.topic.publish(message);
                        self.injecting.store(false, Ordering::SeqCst);
                        injected += 1;
                    }
                    Err(err) => warn!(envelope = %envelope.id, %err, "relay dropped undecodable envelope"),
                }
            }
            next = self.subscriber.poll(0)?;
        }

        Ok(injected)
    }
}

impl<P: Publisher, S: Subscriber> Drop for TopicRelay<P, S> {
    fn drop(&mut self) {
        self.topic.unsubscribe(self.handle);
    }
}

fn forward<P: Publisher + ?Sized>(
    publisher: &P,
    origin: &str,
    message: &TopicMessage,
) -> Result<(), PublishError> {
    let envelope = Envelope::encode(origin, message.name(), message)?;
    publisher.publish(envelope)
}
