//! Response classification.

use crate::error::ResponseError;
use crate::wire::{
    ApiEnvelope, PartialSuccessData, CODE_API_ERROR, CODE_PARTIAL_SUCCESS, CODE_SUCCESS,
};
use beacon_events::AppEvent;
use serde_json::Value;
use std::collections::BTreeSet;

/// Per-chunk classification result.
///
/// Every submitted event lands in exactly one of the three buckets.
#[derive(Debug, Default)]
pub struct ChunkOutcome {
    /// Accepted by the ingest API.
    pub delivered: Vec<AppEvent>,
    /// Worth resubmitting in a later pass.
    pub retryable: Vec<AppEvent>,
    /// Rejected permanently; resubmitting cannot succeed.
    pub discarded: Vec<AppEvent>,
    /// Parse trouble hit while classifying, for the crash reporter.
    pub error: Option<ResponseError>,
}

impl ChunkOutcome {
    fn delivered(chunk: &[AppEvent]) -> Self {
        Self {
            delivered: chunk.to_vec(),
            ..Self::default()
        }
    }

    fn retryable(chunk: &[AppEvent]) -> Self {
        Self {
            retryable: chunk.to_vec(),
            ..Self::default()
        }
    }

    fn retryable_with_error(chunk: &[AppEvent], error: ResponseError) -> Self {
        Self {
            retryable: chunk.to_vec(),
            error: Some(error),
            ..Self::default()
        }
    }

    fn discarded(chunk: &[AppEvent]) -> Self {
        Self {
            discarded: chunk.to_vec(),
            ..Self::default()
        }
    }
}

/// Classify one chunk by the raw ingest response.
///
/// Pure: no transport, no shared state, so every branch is directly
/// testable. `body` is the transport result; `None` means the request never
/// completed and the whole chunk stays retryable.
pub fn classify(body: Option<&str>, chunk: &[AppEvent]) -> ChunkOutcome {
    let raw = match body {
        Some(raw) => raw,
        None => return ChunkOutcome::retryable(chunk),
    };

    let envelope: ApiEnvelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(e) => return ChunkOutcome::retryable_with_error(chunk, ResponseError::Envelope(e)),
    };

    match envelope.code {
        CODE_SUCCESS => ChunkOutcome::delivered(chunk),
        CODE_API_ERROR => ChunkOutcome::discarded(chunk),
        CODE_PARTIAL_SUCCESS => classify_partial(envelope.data, chunk),
        _ => ChunkOutcome::retryable(chunk),
    }
}

fn classify_partial(data: Value, chunk: &[AppEvent]) -> ChunkOutcome {
    let detail: PartialSuccessData = match serde_json::from_value(data) {
        Ok(detail) => detail,
        Err(e) => {
            return ChunkOutcome::retryable_with_error(chunk, ResponseError::PartialDetail(e))
        }
    };

    // Indices outside the chunk are the server's problem, not ours
    let failed: BTreeSet<usize> = detail
        .failed_events
        .iter()
        .filter_map(|f| usize::try_from(f.order_in_batch).ok())
        .filter(|&index| index < chunk.len())
        .collect();

    let mut outcome = ChunkOutcome::default();
    for (index, event) in chunk.iter().enumerate() {
        if failed.contains(&index) {
            outcome.discarded.push(event.clone());
        } else {
            outcome.delivered.push(event.clone());
        }
    }
    outcome
}
