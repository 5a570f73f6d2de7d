//! Storage key constants.

/// Storage keys used by the SDK
pub struct StorageKeys;

impl StorageKeys {
    /// First-install wall-clock time
    pub const FIRST_INSTALL: &'static str = "beacon_first_install";

    /// Time the next-day retention event was recorded
    pub const RETENTION_LOGGED: &'static str = "beacon_2day_retention";

    /// Last launch wall-clock time
    pub const LAST_LAUNCH: &'static str = "beacon_last_launch";

    /// Events parked for retry (JSON array)
    pub const PENDING_EVENTS: &'static str = "beacon_pending_events";
}
