//! SDK configuration.

use beacon_delivery::{DispatcherConfig, MAX_BATCH_SIZE};
use beacon_lifecycle::LifecycleConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default ingest API host.
pub const DEFAULT_INGEST_DOMAIN: &str = "ingest.getbeacon.dev";

/// Default ingest API version segment.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// SDK configuration.
///
/// Everything except `app_id` has a working default; hosts that load config
/// from a file only need to supply the fields they change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Application id assigned by the ingest backend.
    pub app_id: String,
    /// Ingest API host.
    #[serde(default = "default_ingest_domain")]
    pub ingest_domain: String,
    /// Ingest API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Maximum events per ingest request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Master switch for lifecycle events.
    #[serde(default = "default_lifecycle_enabled")]
    pub lifecycle_tracking_enabled: bool,
    /// Lifecycle event names the host opted out of.
    #[serde(default)]
    pub disabled_events: HashSet<String>,
}

fn default_ingest_domain() -> String {
    DEFAULT_INGEST_DOMAIN.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_max_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_lifecycle_enabled() -> bool {
    true
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            ingest_domain: default_ingest_domain(),
            api_version: default_api_version(),
            max_batch_size: default_max_batch_size(),
            timeout_secs: default_timeout_secs(),
            lifecycle_tracking_enabled: true,
            disabled_events: HashSet::new(),
        }
    }
}

impl BeaconConfig {
    /// Config for an app id, everything else at defaults.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            ingest_domain: self.ingest_domain.clone(),
            api_version: self.api_version.clone(),
            max_batch_size: self.max_batch_size,
            timeout_secs: self.timeout_secs,
        }
    }

    pub(crate) fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig {
            lifecycle_tracking_enabled: self.lifecycle_tracking_enabled,
            disabled_events: self.disabled_events.clone(),
        }
    }
}
