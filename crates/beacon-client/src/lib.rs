//! Host-facing facade for the Beacon SDK.
//!
//! `Beacon` wires the event queue, batch dispatcher, retention tracker and
//! key-value store together: recorded events accumulate in memory, `flush`
//! merges them with the persisted retry set and hands the lot to the
//! dispatcher, then parks whatever is worth retrying back in the store.

mod config;
mod sink;

pub use config::{
    BeaconConfig, DEFAULT_API_VERSION, DEFAULT_INGEST_DOMAIN, DEFAULT_TIMEOUT_SECS,
};

use crate::sink::QueueSink;
use beacon_delivery::{
    BatchDispatcher, DiscardListener, ErrorReporter, HttpTransport, StatsObserver,
    TracingReporter, Transport,
};
use beacon_events::{AppEvent, ContextProvider, EventQueue, QueueDepth};
use beacon_lifecycle::RetentionTracker;
use beacon_storage::{KeyValueStore, StorageKeys};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// The Beacon SDK client.
///
/// `track` and `app_open` are cheap and synchronous; nothing touches the
/// network until `flush`. One `Beacon` per app id; it is `Send + Sync` and
/// meant to be shared behind an `Arc`.
pub struct Beacon {
    queue: Arc<EventQueue>,
    dispatcher: BatchDispatcher,
    store: Arc<dyn KeyValueStore>,
    lifecycle: RetentionTracker,
    base_payload: Map<String, Value>,
    flush_lock: Mutex<()>,
}

impl Beacon {
    /// Create a client from its collaborators.
    ///
    /// Internal errors are logged through `tracing` unless a crash reporter
    /// is registered with [`Beacon::with_error_reporter`].
    pub fn new(
        config: BeaconConfig,
        transport: Arc<dyn Transport>,
        context: Arc<dyn ContextProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let queue = Arc::new(EventQueue::new());
        let sink = Arc::new(QueueSink::new(queue.clone()));
        let lifecycle =
            RetentionTracker::new(store.clone(), sink, config.lifecycle_config());
        let dispatcher = BatchDispatcher::new(
            config.dispatcher_config(),
            transport,
            context,
            queue.clone(),
            Arc::new(TracingReporter),
        );

        Self {
            queue,
            dispatcher,
            store,
            lifecycle,
            base_payload: base_payload(&config),
            flush_lock: Mutex::new(()),
        }
    }

    /// Create a client that talks to the ingest API over HTTP.
    ///
    /// The bundled transport is built with the configured request timeout;
    /// hosts with their own HTTP stack use [`Beacon::new`] instead.
    pub fn with_http_transport(
        config: BeaconConfig,
        context: Arc<dyn ContextProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let transport = Arc::new(HttpTransport::from_config(&config.dispatcher_config()));
        Self::new(config, transport, context, store)
    }

    /// Register a stats observer.
    pub fn with_stats_observer(mut self, observer: Arc<dyn StatsObserver>) -> Self {
        self.dispatcher = self.dispatcher.with_stats_observer(observer);
        self
    }

    /// Register a discard listener.
    pub fn with_discard_listener(mut self, listener: Arc<dyn DiscardListener>) -> Self {
        self.dispatcher = self.dispatcher.with_discard_listener(listener);
        self
    }

    /// Route internal errors to the host's crash reporting.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.dispatcher = self.dispatcher.with_error_reporter(reporter);
        self
    }

    /// Record a named event with properties.
    pub fn track(&self, name: impl Into<String>, properties: Map<String, Value>) {
        self.queue.push(AppEvent::track(name, properties));
    }

    /// Run the lifecycle gates for an app open (install, retention, launch).
    pub fn app_open(&self) {
        self.lifecycle.track_app_open_events();
    }

    /// Deliver everything recorded so far plus any events parked for retry.
    ///
    /// The retry set is persisted before this returns, so a crash between
    /// flushes loses nothing that was still deliverable. Returns the number
    /// of events parked for the next flush.
    pub async fn flush(&self) -> usize {
        // The persisted retry set is read-modify-written across the dispatch;
        // a concurrent flush must not load it until this one has stored its
        // result, or a failed pass's events vanish from the store.
        let _pass = self.flush_lock.lock().await;

        let mut events = self.load_pending();
        events.extend(self.queue.drain());
        if events.is_empty() {
            debug!("Nothing to flush");
            return 0;
        }

        let total = events.len();
        let retry = self.dispatcher.dispatch(&self.base_payload, events).await;
        debug!(total = total, retrying = retry.len(), "Flush finished");

        self.store_pending(&retry);
        retry.len()
    }

    /// Post a stats object to the monitoring endpoint.
    pub async fn report_monitor(&self, stat: &Value) -> Option<String> {
        self.dispatcher.report_monitor(stat).await
    }

    /// Number of events waiting in memory.
    pub fn queued_events(&self) -> usize {
        self.queue.len()
    }

    /// Events accepted by the ingest API so far, in delivery order.
    pub async fn delivered_events(&self) -> Vec<AppEvent> {
        self.dispatcher.delivered_events().await
    }

    /// Lifetime count of permanently discarded events.
    pub async fn total_discarded(&self) -> u64 {
        self.dispatcher.total_discarded().await
    }

    fn load_pending(&self) -> Vec<AppEvent> {
        let raw = match self.store.get(StorageKeys::PENDING_EVENTS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read pending events");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(events) => events,
            Err(e) => {
                // A corrupt retry set is dropped rather than wedging every flush
                warn!(error = %e, "Discarding unreadable pending events");
                Vec::new()
            }
        }
    }

    fn store_pending(&self, retry: &[AppEvent]) {
        let raw = match serde_json::to_string(retry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize pending events");
                return;
            }
        };
        if let Err(e) = self.store.set(StorageKeys::PENDING_EVENTS, &raw) {
            warn!(error = %e, "Failed to persist pending events");
        }
    }
}

/// Fields sent with every ingest request, alongside the batch.
fn base_payload(config: &BeaconConfig) -> Map<String, Value> {
    let mut base = Map::new();
    base.insert("app_id".to_string(), Value::from(config.app_id.clone()));
    base.insert("client".to_string(), Value::from("rust"));
    base.insert(
        "sdk_version".to_string(),
        Value::from(env!("CARGO_PKG_VERSION")),
    );
    base
}
