//! Event data model for the Beacon SDK delivery core.
//!
//! This crate provides:
//! - AppEvent: immutable analytics event with wire rendering
//! - EventQueue: in-memory FIFO buffering events between flushes
//! - EventSink / ContextProvider / QueueDepth: collaborator traits

mod error;
mod event;
mod queue;
mod sink;

pub use error::{EventError, EventResult};
pub use event::{AppEvent, ContextProvider, EventId, EventType};
pub use queue::{EventQueue, QueueDepth};
pub use sink::EventSink;
