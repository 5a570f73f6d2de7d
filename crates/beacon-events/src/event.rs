//! Analytics event model and wire rendering.

use crate::{EventError, EventResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide id source.
static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique event id.
///
/// Ids increase monotonically within a process and are never persisted;
/// an event reloaded from disk is assigned a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    /// Allocate the next id.
    pub fn next() -> Self {
        Self(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event category on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Named event recorded by the host application.
    Track,
    /// Event generated by the SDK itself (lifecycle, diagnostics).
    System,
}

impl EventType {
    /// Wire string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Track => "track",
            EventType::System => "system",
        }
    }
}

/// Collects device/app metadata attached to every event at send time.
pub trait ContextProvider: Send + Sync {
    /// Build the context object for an event.
    fn context_for(&self, event: &AppEvent) -> EventResult<Value>;
}

/// A single analytics event.
///
/// Immutable once created. Wire rendering derives JSON without touching the
/// event, so the same value can be resubmitted after a failed delivery
/// attempt. Events serialize for the on-disk retry set; the id is skipped
/// and regenerated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEvent {
    #[serde(skip, default = "EventId::next")]
    id: EventId,
    event_type: EventType,
    name: Option<String>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl AppEvent {
    /// Create an event with an explicit type and optional name.
    pub fn new(event_type: EventType, name: Option<String>, properties: Map<String, Value>) -> Self {
        Self {
            id: EventId::next(),
            event_type,
            name,
            timestamp: Utc::now(),
            properties,
        }
    }

    /// Create a named event recorded by the host application.
    pub fn track(name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self::new(EventType::Track, Some(name.into()), properties)
    }

    /// Create a named SDK-generated event.
    pub fn system(name: impl Into<String>) -> Self {
        Self::new(EventType::System, Some(name.into()), Map::new())
    }

    /// Event id, unique within this process.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Event category.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Event name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creation instant.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Caller-attached properties.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Render the wire representation of this event.
    ///
    /// Produces `{type, event, timestamp, properties, context}`; `event` is
    /// omitted for unnamed events and `properties` when empty.
    pub fn to_wire(&self, context: &dyn ContextProvider) -> EventResult<Value> {
        let mut body = Map::new();
        body.insert("type".to_string(), Value::from(self.event_type.as_str()));
        if let Some(name) = &self.name {
            body.insert("event".to_string(), Value::from(name.clone()));
        }
        body.insert(
            "timestamp".to_string(),
            Value::from(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        if !self.properties.is_empty() {
            body.insert("properties".to_string(), Value::Object(self.properties.clone()));
        }
        body.insert("context".to_string(), context.context_for(self)?);
        Ok(Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedContext;

    impl ContextProvider for FixedContext {
        fn context_for(&self, _event: &AppEvent) -> EventResult<Value> {
            Ok(json!({ "device": "test-device" }))
        }
    }

    struct BrokenContext;

    impl ContextProvider for BrokenContext {
        fn context_for(&self, _event: &AppEvent) -> EventResult<Value> {
            Err(EventError::Context("metadata store locked".to_string()))
        }
    }

    #[test]
    fn test_event_ids_are_unique_and_increasing() {
        let a = AppEvent::track("first", Map::new());
        let b = AppEvent::track("second", Map::new());
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_event_type_wire_strings() {
        assert_eq!(EventType::Track.as_str(), "track");
        assert_eq!(EventType::System.as_str(), "system");
    }

    #[test]
    fn test_to_wire_shape() {
        let mut props = Map::new();
        props.insert("plan".to_string(), json!("pro"));
        let event = AppEvent::track("Purchase", props);

        let wire = event.to_wire(&FixedContext).unwrap();
        assert_eq!(wire["type"], "track");
        assert_eq!(wire["event"], "Purchase");
        assert_eq!(wire["properties"]["plan"], "pro");
        assert_eq!(wire["context"]["device"], "test-device");
        assert!(wire["timestamp"].is_string());
    }

    #[test]
    fn test_to_wire_omits_empty_fields() {
        let event = AppEvent::new(EventType::System, None, Map::new());

        let wire = event.to_wire(&FixedContext).unwrap();
        let body = wire.as_object().unwrap();
        assert!(!body.contains_key("event"));
        assert!(!body.contains_key("properties"));
        assert!(body.contains_key("context"));
    }

    #[test]
    fn test_to_wire_propagates_context_failure() {
        let event = AppEvent::track("Purchase", Map::new());

        let err = event.to_wire(&BrokenContext).unwrap_err();
        assert!(matches!(err, EventError::Context(_)));
    }

    #[test]
    fn test_persisted_roundtrip_regenerates_id() {
        let event = AppEvent::track("Signup", Map::new());
        let json = serde_json::to_string(&event).unwrap();
        let restored: AppEvent = serde_json::from_str(&json).unwrap();

        assert_ne!(restored.id(), event.id());
        assert_eq!(restored.name(), event.name());
        assert_eq!(restored.event_type(), event.event_type());
        assert_eq!(restored.timestamp(), event.timestamp());
    }
}
