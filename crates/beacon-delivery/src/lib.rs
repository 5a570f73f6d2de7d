//! Batch delivery core for the Beacon SDK.
//!
//! This crate provides:
//! - BatchDispatcher: ordered, single-flight chunk delivery with full
//!   outcome accounting
//! - classify: pure response classification into delivered / retryable /
//!   discarded
//! - Transport: async HTTP seam with a reqwest implementation
//! - StatsObserver / DiscardListener / ErrorReporter: host-facing sinks

mod classifier;
mod dispatcher;
mod endpoints;
mod error;
mod report;
mod stats;
mod transport;
mod wire;

pub use classifier::{classify, ChunkOutcome};
pub use dispatcher::{BatchDispatcher, DispatcherConfig, MAX_BATCH_SIZE};
pub use error::ResponseError;
pub use report::{ErrorReporter, TracingReporter};
pub use stats::{DiscardListener, StatsObserver, StatsSnapshot};
pub use transport::{HttpTransport, Transport};
pub use wire::{
    ApiEnvelope, FailedEvent, PartialSuccessData, CODE_API_ERROR, CODE_PARTIAL_SUCCESS,
    CODE_SUCCESS,
};
