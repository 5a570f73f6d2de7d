//! Delivery error types.

use thiserror::Error;

/// Ingest response that could not be understood.
///
/// Never returned as `Err`: classification carries this in the chunk
/// outcome, the chunk is downgraded to retryable and the dispatcher forwards
/// the error to the crash reporter.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// Response body is not a valid envelope
    #[error("Malformed response envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// Partial-success response with an unusable failed-events section
    #[error("Malformed partial-success detail: {0}")]
    PartialDetail(#[source] serde_json::Error),
}
