//! In-memory event queue.

use crate::AppEvent;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Reports how many events are waiting to be flushed.
pub trait QueueDepth: Send + Sync {
    /// Number of queued events.
    fn len(&self) -> usize;

    /// True when nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FIFO buffer for events awaiting delivery.
///
/// Events accumulate here between flushes; `drain` hands the whole backlog
/// to the caller in recording order.
#[derive(Default)]
pub struct EventQueue {
    events: Mutex<Vec<AppEvent>>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<AppEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event.
    pub fn push(&self, event: AppEvent) {
        let mut events = self.events();
        events.push(event);
        debug!(queued = events.len(), "Queued event");
    }

    /// Remove and return all queued events in recording order.
    pub fn drain(&self) -> Vec<AppEvent> {
        std::mem::take(&mut *self.events())
    }
}

impl QueueDepth for EventQueue {
    fn len(&self) -> usize {
        self.events().len()
    }
}
