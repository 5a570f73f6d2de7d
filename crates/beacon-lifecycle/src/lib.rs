//! Lifecycle event gating for the Beacon SDK.
//!
//! Fires first-install, next-day-retention and launch events through the
//! shared event sink, gated by wall-clock markers persisted in the
//! key-value store. Everything here is best-effort: store or parse trouble
//! closes the affected gate and is never surfaced.

use beacon_events::{AppEvent, EventSink};
use beacon_storage::{KeyValueStore, StorageKeys};
use chrono::{DateTime, Days, Local, NaiveDateTime};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of the event fired once per install.
pub const EVENT_INSTALL: &str = "InstallApp";

/// Name of the event fired on the day after install.
pub const EVENT_RETENTION: &str = "2DayRetention";

/// Name of the event fired on every qualifying launch.
pub const EVENT_LAUNCH: &str = "LaunchApp";

/// Wall-clock format for persisted markers.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar-day format used for the retention comparison.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle tracking configuration.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Master switch for lifecycle events.
    pub lifecycle_tracking_enabled: bool,
    /// Lifecycle event names the host opted out of.
    pub disabled_events: HashSet<String>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lifecycle_tracking_enabled: true,
            disabled_events: HashSet::new(),
        }
    }
}

/// Gates lifecycle events on persisted markers.
///
/// All three gates run on every app open: install fires once per install,
/// retention fires once on the calendar day after install, launch fires on
/// every qualifying open.
pub struct RetentionTracker {
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn EventSink>,
    config: LifecycleConfig,
}

impl RetentionTracker {
    /// Create a tracker over the given store and sink.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn EventSink>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Run the install, retention and launch gates for an app open.
    pub fn track_app_open_events(&self) {
        self.track_app_open_events_at(Local::now());
    }

    fn track_app_open_events_at(&self, now: DateTime<Local>) {
        self.track_first_install(now);
        self.track_retention(now);
        self.track_launch(now);
    }

    /// Fires once per install. The marker is written even when tracking is
    /// disabled: it records install time, not whether the event fired, and
    /// the retention gate depends on it.
    fn track_first_install(&self, now: DateTime<Local>) {
        if self.read_marker(StorageKeys::FIRST_INSTALL).is_some() {
            return;
        }

        if self.should_track(EVENT_INSTALL) {
            self.sink.track(AppEvent::system(EVENT_INSTALL));
        }
        self.write_marker(StorageKeys::FIRST_INSTALL, now);
    }

    /// Fires on the calendar day after install, at most once.
    fn track_retention(&self, now: DateTime<Local>) {
        if self.read_marker(StorageKeys::RETENTION_LOGGED).is_some() {
            return;
        }
        let installed_at = match self.read_marker(StorageKeys::FIRST_INSTALL) {
            Some(raw) => raw,
            None => return,
        };

        let installed_at = match NaiveDateTime::parse_from_str(&installed_at, TIME_FORMAT) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Unreadable marker: the gate stays closed
                debug!(error = %e, "Ignoring unparseable install marker");
                return;
            }
        };

        if self.should_track(EVENT_RETENTION)
            && retention_day_matches(installed_at, now.naive_local())
        {
            self.sink.track(AppEvent::system(EVENT_RETENTION));
            self.write_marker(StorageKeys::RETENTION_LOGGED, now);
        }
    }

    /// Fires on every qualifying launch, refreshing the last-launch marker.
    fn track_launch(&self, now: DateTime<Local>) {
        if self.should_track(EVENT_LAUNCH) {
            self.sink.track(AppEvent::system(EVENT_LAUNCH));
            self.write_marker(StorageKeys::LAST_LAUNCH, now);
        }
    }

    fn should_track(&self, name: &str) -> bool {
        self.config.lifecycle_tracking_enabled && !self.config.disabled_events.contains(name)
    }

    fn read_marker(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read lifecycle marker");
                None
            }
        }
    }

    fn write_marker(&self, key: &str, at: DateTime<Local>) {
        let value = at.format(TIME_FORMAT).to_string();
        if let Err(e) = self.store.set(key, &value) {
            warn!(key = %key, error = %e, "Failed to write lifecycle marker");
        }
    }
}

/// True when `now` falls on the calendar day directly after `installed_at`.
///
/// Compared as formatted date strings: this is a wall-clock day boundary,
/// not a 24-hour delta. 23:50 on install day to 00:10 the next day
/// qualifies; 09:00 to 09:00 two days later does not.
pub fn retention_day_matches(installed_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    match installed_at.date().checked_add_days(Days::new(1)) {
        Some(next_day) => {
            next_day.format(DATE_FORMAT).to_string() == now.date().format(DATE_FORMAT).to_string()
        }
        None => false,
    }
}
