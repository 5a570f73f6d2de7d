//! Batch dispatcher: chunking, delivery and accounting.

use crate::classifier::{classify, ChunkOutcome};
use crate::endpoints;
use crate::report::ErrorReporter;
use crate::stats::{DeliveryStats, DiscardListener, StatsNotifier, StatsObserver};
use crate::transport::Transport;
use crate::wire;
use beacon_events::{AppEvent, ContextProvider, QueueDepth};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum events per ingest request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Tag under which dispatcher errors reach the crash reporter.
const TAG: &str = module_path!();

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Ingest API host.
    pub ingest_domain: String,
    /// Ingest API version segment.
    pub api_version: String,
    /// Maximum events per request; values below 1 are treated as 1.
    pub max_batch_size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            ingest_domain: "ingest.getbeacon.dev".to_string(),
            api_version: "v2".to_string(),
            max_batch_size: MAX_BATCH_SIZE,
            timeout_secs: 30,
        }
    }
}

/// Delivers recorded events in ordered chunks and classifies every outcome.
///
/// One pass runs at a time: `dispatch` holds an exclusive lock across the
/// whole chunk loop, so a concurrent caller waits for the pass in progress
/// to finish. All accounting lives here; nothing is global.
pub struct BatchDispatcher {
    config: DispatcherConfig,
    batch_url: String,
    monitor_url: String,
    post_headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
    context: Arc<dyn ContextProvider>,
    reporter: Arc<dyn ErrorReporter>,
    notifier: StatsNotifier,
    discard_listener: Option<Arc<dyn DiscardListener>>,
    stats: Mutex<DeliveryStats>,
}

impl BatchDispatcher {
    /// Create a dispatcher.
    ///
    /// `queue` is the producer-side backlog; its depth feeds the `queued`
    /// term of every stats snapshot.
    pub fn new(
        config: DispatcherConfig,
        transport: Arc<dyn Transport>,
        context: Arc<dyn ContextProvider>,
        queue: Arc<dyn QueueDepth>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            batch_url: endpoints::batch_url(&config.ingest_domain, &config.api_version),
            monitor_url: endpoints::monitor_url(&config.ingest_domain, &config.api_version),
            post_headers: endpoints::post_headers(&config.api_version),
            transport,
            context,
            reporter,
            notifier: StatsNotifier::new(queue, None),
            discard_listener: None,
            stats: Mutex::new(DeliveryStats::default()),
            config,
        }
    }

    /// Register a stats observer.
    pub fn with_stats_observer(mut self, observer: Arc<dyn StatsObserver>) -> Self {
        self.notifier.set_observer(observer);
        self
    }

    /// Register a discard listener.
    pub fn with_discard_listener(mut self, listener: Arc<dyn DiscardListener>) -> Self {
        self.discard_listener = Some(listener);
        self
    }

    /// Replace the crash reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Deliver `events` in order, returning the subset worth retrying later.
    ///
    /// Chunks go out sequentially; each is fully classified before the next
    /// is sent. Permanently rejected events are counted and announced to the
    /// discard listener; the caller is expected to persist the returned
    /// retry set before starting another pass. Never fails: every event ends
    /// up delivered, returned for retry, or discarded.
    pub async fn dispatch(
        &self,
        base_payload: &Map<String, Value>,
        events: Vec<AppEvent>,
    ) -> Vec<AppEvent> {
        if events.is_empty() {
            return Vec::new();
        }

        let mut stats = self.stats.lock().await;

        stats.begin_pass(&events);
        self.notifier.emit(&stats);

        let chunk_size = self.config.max_batch_size.max(1);
        let mut retryable = Vec::new();
        let mut discarded_in_pass: u64 = 0;

        for chunk in events.chunks(chunk_size) {
            let outcome = self.send_chunk(base_payload, chunk).await;

            if let Some(error) = &outcome.error {
                self.reporter.report(TAG, error);
            }

            discarded_in_pass += outcome.discarded.len() as u64;
            let failed = outcome.retryable.len() + outcome.discarded.len();
            retryable.extend(outcome.retryable);
            stats.record_chunk(outcome.delivered, failed);
            self.notifier.emit(&stats);
        }

        debug!(
            delivered = stats.succeeded(),
            retrying = retryable.len(),
            discarded = discarded_in_pass,
            "Dispatch pass finished"
        );

        if discarded_in_pass > 0 {
            let total = stats.record_discarded(discarded_in_pass);
            warn!(discarded = discarded_in_pass, total = total, "Events discarded");
            if let Some(listener) = &self.discard_listener {
                listener.on_discarded(total);
            }
        }

        stats.end_pass();
        self.notifier.emit(&stats);

        retryable
    }

    /// Render, post and classify one chunk.
    async fn send_chunk(&self, base_payload: &Map<String, Value>, chunk: &[AppEvent]) -> ChunkOutcome {
        let chunk_id = Uuid::new_v4();

        // An event that cannot be rendered is dropped from the payload and
        // discarded; retrying cannot make it serializable. Rejection indices
        // from the server refer to the payload as submitted.
        let mut batch = Vec::with_capacity(chunk.len());
        let mut submitted = Vec::with_capacity(chunk.len());
        let mut unrenderable = Vec::new();
        for event in chunk {
            match event.to_wire(self.context.as_ref()) {
                Ok(rendered) => {
                    batch.push(rendered);
                    submitted.push(event.clone());
                }
                Err(e) => {
                    warn!(
                        chunk_id = %chunk_id,
                        event_id = %event.id(),
                        error = %e,
                        "Dropping unrenderable event"
                    );
                    self.reporter.report(TAG, &e);
                    unrenderable.push(event.clone());
                }
            }
        }

        let mut outcome = if submitted.is_empty() {
            ChunkOutcome::default()
        } else {
            let body = wire::batch_body(base_payload, batch).to_string();
            debug!(
                chunk_id = %chunk_id,
                url = %self.batch_url,
                events = submitted.len(),
                "Sending chunk"
            );
            let response = self
                .transport
                .post(&self.batch_url, &self.post_headers, body)
                .await;
            classify(response.as_deref(), &submitted)
        };

        outcome.discarded.extend(unrenderable);
        outcome
    }

    /// Post one stats object to the monitoring endpoint.
    ///
    /// Fire-and-forget: a failure is logged and never retried. Returns the
    /// raw response for callers that want to inspect it.
    pub async fn report_monitor(&self, stat: &Value) -> Option<String> {
        let response = self
            .transport
            .post(&self.monitor_url, &self.post_headers, stat.to_string())
            .await;
        if response.is_none() {
            warn!(url = %self.monitor_url, "Monitor report failed");
        }
        response
    }

    /// Events accepted by the ingest API so far, in delivery order.
    pub async fn delivered_events(&self) -> Vec<AppEvent> {
        self.stats.lock().await.delivered_events().to_vec()
    }

    /// Lifetime count of permanently discarded events.
    pub async fn total_discarded(&self) -> u64 {
        self.stats.lock().await.total_discarded()
    }
}
