//! Service bus - carries topic messages across runtime boundaries.
//!
//! Widgets of one page can live in separate runtimes (micro-frontends loaded
//! into different hosts or workers). A `TopicRelay` bridges each runtime's
//! local topic to a shared bus:
//!
//! ```text
//! ┌────────────┐   relay A   ┌──────────────┐   relay B   ┌────────────┐
//! │ topic (A)  │ ──────────▶ │  Publisher   │ ──────────▶ │ topic (B)  │
//! │            │ ◀────────── │  Subscriber  │ ◀────────── │            │
//! └────────────┘             └──────────────┘             └────────────┘
//! ```
//!
//! Messages travel as `Envelope`s with a bitcode payload.

mod envelope;
mod in_memory_queue;

pub use envelope::{Envelope, PublishError, Publisher, Subscriber};
pub use in_memory_queue::InMemoryQueue;
