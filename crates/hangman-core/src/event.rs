//! Event abstractions and the notification sink seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Metadata attached to every emitted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name, e.g. `game.round_won`.
    pub event_type: String,
    /// Monotonically increasing number within the session.
    pub sequence_number: u64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for a new event stamped by `clock`.
    #[must_use]
    pub fn new(event_type: &str, sequence_number: u64, clock: &dyn Clock) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            sequence_number,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all emitted events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}

/// Receiver for events published by the engine.
///
/// Implemented by the presentation layer (renderers, announcers, sound
/// cues). Publishing never fails from the engine's point of view.
pub trait EventSink<E>: Send + Sync {
    /// Delivers one event.
    fn publish(&self, event: &E);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<E> EventSink<E> for NullSink {
    fn publish(&self, _event: &E) {}
}
