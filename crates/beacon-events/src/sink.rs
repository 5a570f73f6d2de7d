//! Shared event sink trait.

use crate::AppEvent;

/// Fire-and-forget sink shared by host instrumentation and lifecycle tracking.
pub trait EventSink: Send + Sync {
    /// Record an event for later delivery.
    fn track(&self, event: AppEvent);
}
