//! Type-erased event envelope, the unit handed to listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{DomainEvent, EventId};

/// Envelope for a published event.
///
/// The payload is serialized once, when the owning aggregate's buffer is
/// drained into a unit of work; listeners receive the same envelope instance
/// sequentially and may deserialize the payload into the typed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_id: EventId,
    event_type: String,
    aggregate_type: String,
    occurred_at: DateTime<Utc>,
    payload: serde_json::Value,
}

impl EventEnvelope {
    /// Wrap a typed domain event for publication.
    pub fn from_typed<E: DomainEvent>(
        aggregate_type: impl Into<String>,
        event: &E,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            event_id: event.event_id(),
            event_type: event.event_type().to_string(),
            aggregate_type: aggregate_type.into(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Deserialize the payload back into a typed event.
    pub fn payload_as<E: serde::de::DeserializeOwned>(&self) -> serde_json::Result<E> {
        serde_json::from_value(self.payload.clone())
    }
}
