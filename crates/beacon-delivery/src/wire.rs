//! Wire format for the ingest API.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Whole batch accepted.
pub const CODE_SUCCESS: i32 = 0;

/// Batch accepted except the events listed in `data.failed_events`.
pub const CODE_PARTIAL_SUCCESS: i32 = 20001;

/// Batch rejected outright; resubmitting it cannot succeed.
pub const CODE_API_ERROR: i32 = 40000;

/// Top-level response envelope.
///
/// `data` stays raw here; the partial-success detail is parsed in a second
/// step so junk in `data` cannot poison a success or hard-error verdict.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    /// API status code (not the HTTP status).
    pub code: i32,
    /// Code-specific payload.
    #[serde(default)]
    pub data: Value,
}

/// Detail section of a partial-success response.
#[derive(Debug, Deserialize)]
pub struct PartialSuccessData {
    /// Events the server rejected.
    pub failed_events: Vec<FailedEvent>,
}

/// One rejected event inside an otherwise accepted batch.
#[derive(Debug, Deserialize)]
pub struct FailedEvent {
    /// 0-based position within the submitted batch.
    pub order_in_batch: i64,
}

/// Assemble a request body: the shared base payload plus this chunk.
pub fn batch_body(base: &Map<String, Value>, batch: Vec<Value>) -> Value {
    let mut body = base.clone();
    body.insert("batch".to_string(), Value::Array(batch));
    Value::Object(body)
}
