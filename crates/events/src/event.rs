//! Domain event contract.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single domain event occurrence.
///
/// Unlike entity keys, event ids are generated in-process (UUIDv7,
/// time-ordered) at the moment the aggregate records the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A domain event: the immutable record of one state change.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - stamped with a generated [`EventId`] and a creation timestamp
/// - published only after the owning transaction commits
pub trait DomainEvent: Clone + core::fmt::Debug + Serialize + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "billing.subscription.started").
    fn event_type(&self) -> &'static str;

    /// Unique identifier of this occurrence.
    fn event_id(&self) -> EventId;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
