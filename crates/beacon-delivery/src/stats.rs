//! Delivery accounting and observer notification.

use beacon_events::{AppEvent, EventId, QueueDepth};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Point-in-time delivery counters handed to the stats observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Events in the pass currently being dispatched.
    pub to_be_sent: usize,
    /// Events accepted so far in the current pass.
    pub succeeded: usize,
    /// Events that failed, retryably or permanently, so far in the current pass.
    pub failed: usize,
    /// Lifetime events handed to the dispatcher plus events still queued.
    pub queued: usize,
    /// Lifetime count of accepted events.
    pub total_delivered: usize,
}

/// Observer for delivery statistics.
pub trait StatsObserver: Send + Sync {
    /// Receive a snapshot. Called after every accounting change.
    fn on_stats(&self, snapshot: StatsSnapshot);
}

/// Listener for permanently discarded events.
pub trait DiscardListener: Send + Sync {
    /// Receive the cumulative number of discarded events.
    fn on_discarded(&self, total: u64);
}

/// Running accounting state owned by the dispatcher.
///
/// Pass counters reset at each dispatch boundary. The id set, delivered list
/// and discard total accumulate for the life of the process, mirroring what
/// the host sees in the `queued` and `total_delivered` terms.
#[derive(Default)]
pub struct DeliveryStats {
    to_be_sent: usize,
    succeeded: usize,
    failed: usize,
    seen: BTreeSet<EventId>,
    delivered: Vec<AppEvent>,
    total_discarded: u64,
}

impl DeliveryStats {
    /// Start accounting for a new pass.
    pub fn begin_pass(&mut self, events: &[AppEvent]) {
        self.to_be_sent = events.len();
        self.succeeded = 0;
        self.failed = 0;
        self.seen.extend(events.iter().map(|e| e.id()));
    }

    /// Fold one chunk's results into the pass.
    pub fn record_chunk(&mut self, delivered: Vec<AppEvent>, failed: usize) {
        self.succeeded += delivered.len();
        self.failed += failed;
        self.delivered.extend(delivered);
    }

    /// Add permanently discarded events, returning the new running total.
    pub fn record_discarded(&mut self, count: u64) -> u64 {
        self.total_discarded += count;
        self.total_discarded
    }

    /// Zero the pass counters.
    pub fn end_pass(&mut self) {
        self.to_be_sent = 0;
        self.succeeded = 0;
        self.failed = 0;
    }

    /// Events accepted in this pass so far.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Lifetime count of permanently discarded events.
    pub fn total_discarded(&self) -> u64 {
        self.total_discarded
    }

    /// Lifetime list of accepted events, in delivery order.
    pub fn delivered_events(&self) -> &[AppEvent] {
        &self.delivered
    }

    /// Current counters; `queue_len` is the producer-side backlog.
    pub fn snapshot(&self, queue_len: usize) -> StatsSnapshot {
        StatsSnapshot {
            to_be_sent: self.to_be_sent,
            succeeded: self.succeeded,
            failed: self.failed,
            queued: self.seen.len() + queue_len,
            total_delivered: self.delivered.len(),
        }
    }
}

/// Pushes snapshots to the registered observer.
pub struct StatsNotifier {
    observer: Option<Arc<dyn StatsObserver>>,
    queue: Arc<dyn QueueDepth>,
}

impl StatsNotifier {
    /// Create a notifier reading queue depth from `queue`.
    pub fn new(queue: Arc<dyn QueueDepth>, observer: Option<Arc<dyn StatsObserver>>) -> Self {
        Self { observer, queue }
    }

    /// Register the observer.
    pub fn set_observer(&mut self, observer: Arc<dyn StatsObserver>) {
        self.observer = Some(observer);
    }

    /// Emit a snapshot; no-op without an observer.
    pub fn emit(&self, stats: &DeliveryStats) {
        if let Some(observer) = &self.observer {
            observer.on_stats(stats.snapshot(self.queue.len()));
        }
    }
}
