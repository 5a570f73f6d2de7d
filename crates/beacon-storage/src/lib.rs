//! Key-value persistence abstraction for the Beacon SDK.
//!
//! Lifecycle markers and the retry set are stored through the
//! [`KeyValueStore`] trait; hosts plug in whatever durable store the
//! platform offers. Two reference implementations ship here:
//! - [`MemoryStore`]: process-local, for tests and ephemeral sessions
//! - [`FileStore`]: single JSON file with a write-through cache

mod file;
mod keys;
mod memory;
mod store;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
