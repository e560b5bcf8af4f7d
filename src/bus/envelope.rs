//! Envelope codec and the publisher/subscriber traits of the bus.

use std::error::Error;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A topic message wrapped for transport across a runtime boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Unique identifier for this envelope
    pub id: String,
    /// Identity of the relay that put the envelope on the bus
    pub origin: String,
    /// Message name (e.g., "fieldValues", "searchConfigs")
    pub name: String,
    /// bitcode-serialized message
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        name: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            name: name.into(),
            payload,
        }
    }

    /// Wrap a serializable message, generating a fresh envelope id.
    pub fn encode<T: Serialize>(
        origin: impl Into<String>,
        name: impl Into<String>,
        message: &T,
    ) -> Result<Self, bitcode::Error> {
        let bytes = bitcode::serialize(message)?;
        Ok(Self::new(
            uuid::Uuid::new_v4().to_string(),
            origin,
            name,
            bytes,
        ))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, bitcode::Error> {
        bitcode::deserialize(&self.payload)
    }
}

/// Error type for bus operations.
#[derive(Debug)]
pub enum PublishError {
    /// Connection to the bus failed
    ConnectionFailed(String),
    /// Encoding the message failed
    SerializationFailed(String),
    /// The bus rejected the envelope
    Rejected(String),
    /// Timeout waiting for the bus
    Timeout,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            PublishError::SerializationFailed(msg) => write!(f, "serialization failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "envelope rejected: {}", msg),
            PublishError::Timeout => write!(f, "bus timeout"),
        }
    }
}

impl Error for PublishError {}

impl From<bitcode::Error> for PublishError {
    fn from(err: bitcode::Error) -> Self {
        PublishError::SerializationFailed(err.to_string())
    }
}

/// Puts envelopes on a bus.
pub trait Publisher: Send + Sync {
    fn publish(&self, envelope: Envelope) -> Result<(), PublishError>;
}

/// Pulls envelopes off a bus. Each subscriber sees every envelope (fan-out).
pub trait Subscriber: Send + Sync {
    /// Poll for the next envelope, blocking until one is available or timeout.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Envelope>, PublishError>;
}
