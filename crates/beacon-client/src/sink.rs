//! Queue-backed event sink.

use beacon_events::{AppEvent, EventQueue, EventSink};
use std::sync::Arc;

/// Sink that records events straight into the in-memory queue.
///
/// The retention tracker writes through this, so lifecycle events travel
/// the same path as everything else.
pub(crate) struct QueueSink {
    queue: Arc<EventQueue>,
}

impl QueueSink {
    pub(crate) fn new(queue: Arc<EventQueue>) -> Self {
        Self { queue }
    }
}

impl EventSink for QueueSink {
    fn track(&self, event: AppEvent) {
        self.queue.push(event);
    }
}
