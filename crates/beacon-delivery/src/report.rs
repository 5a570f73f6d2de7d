//! Crash reporting sink.

use std::error::Error;
use tracing::warn;

/// Fire-and-forget sink for internal errors.
///
/// The delivery core recovers from every error locally; this is how the
/// host's crash reporting still gets to see them. Implementations must not
/// panic.
pub trait ErrorReporter: Send + Sync {
    /// Report an internal error under a subsystem tag.
    fn report(&self, tag: &str, error: &(dyn Error + 'static));
}

/// Default reporter that logs through `tracing`.
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, tag: &str, error: &(dyn Error + 'static)) {
        warn!(tag = %tag, error = %error, "Internal error reported");
    }
}
