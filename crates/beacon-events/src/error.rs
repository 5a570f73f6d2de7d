//! Event error types.

use thiserror::Error;

/// Event error type.
#[derive(Error, Debug)]
pub enum EventError {
    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Context collection failed
    #[error("Context unavailable: {0}")]
    Context(String),
}

/// Result type alias using EventError.
pub type EventResult<T> = Result<T, EventError>;
