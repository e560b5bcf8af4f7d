//! In-memory queue for testing and single-process hosts.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::{Envelope, PublishError, Publisher, Subscriber};

/// In-memory queue implementing both `Publisher` and `Subscriber`.
///
/// Envelopes are appended to a shared log. Each subscriber handle created
/// with `new_subscriber()` keeps its own read position, so every relay
/// attached to the queue sees every envelope.
///
/// ## Example
///
/// ```
/// use search_config_sync::bus::{Envelope, InMemoryQueue, Publisher, Subscriber};
///
/// let queue = InMemoryQueue::new();
/// let reader = queue.new_subscriber();
///
/// queue.publish(Envelope::new("e-1", "relay-a", "add", vec![])).unwrap();
///
/// assert_eq!(reader.poll(10).unwrap().unwrap().name, "add");
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    log: Arc<RwLock<Vec<Envelope>>>,
    position: Arc<Mutex<usize>>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
        }
    }

    /// A handle on the same log with its own read position, starting at the
    /// beginning of the log.
    pub fn new_subscriber(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
        }
    }

    pub fn envelopes(&self) -> Vec<Envelope> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Message names in publish order.
    pub fn names(&self) -> Vec<String> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Publisher for InMemoryQueue {
    fn publish(&self, envelope: Envelope) -> Result<(), PublishError> {
        self.log
            .write()
            .map_err(|_| PublishError::Rejected("queue lock poisoned".into()))?
            .push(envelope);
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Envelope>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self
                    .log
                    .read()
                    .map_err(|_| PublishError::ConnectionFailed("queue lock poisoned".into()))?;
                let mut pos = self
                    .position
                    .lock()
                    .map_err(|_| PublishError::ConnectionFailed("queue lock poisoned".into()))?;

                if *pos < log.len() {
                    let envelope = log[*pos].clone();
                    *pos += 1;
                    return Ok(Some(envelope));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
