//! App metadata aggregate + its domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prepdeck_core::{
    AggregateRoot, DomainError, DomainResult, Entity, EventBuffer, numeric_id, same_identity,
};
use prepdeck_events::{DomainEvent, EventId};

numeric_id!(AppInfoId, "AppInfoId");

/// Metadata describing one app entry in the catalog.
#[derive(Debug, Clone)]
pub struct AppInfo {
    id: Option<AppInfoId>,
    name: String,
    description: String,
    icon_url: Option<String>,
    updated_at: DateTime<Utc>,
    events: EventBuffer<AppInfoEvent>,
}

impl AppInfo {
    /// Register a new app entry. Records [`AppInfoRegistered`].
    pub fn register(
        name: impl Into<String>,
        description: impl Into<String>,
        icon_url: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("app name must not be blank"));
        }

        let mut info = Self {
            id: None,
            name: name.clone(),
            description: description.into(),
            icon_url,
            updated_at: now,
            events: EventBuffer::new(),
        };
        info.events.record(AppInfoEvent::Registered(AppInfoRegistered {
            event_id: EventId::new(),
            occurred_at: now,
            name,
        }));
        Ok(info)
    }

    /// Rebuild from a stored row. Does not record events.
    pub fn hydrate(
        id: AppInfoId,
        name: String,
        description: String,
        icon_url: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            icon_url,
            updated_at,
            events: EventBuffer::new(),
        }
    }

    pub fn assign_id(&mut self, id: AppInfoId) {
        self.id = Some(id);
    }

    /// Update the entry's metadata. Records [`AppInfoUpdated`].
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        icon_url: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("app name must not be blank"));
        }

        self.name = name.clone();
        self.description = description.into();
        self.icon_url = icon_url;
        self.updated_at = now;
        self.events.record(AppInfoEvent::Updated(AppInfoUpdated {
            event_id: EventId::new(),
            occurred_at: now,
            name,
        }));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for AppInfo {
    type Id = AppInfoId;

    fn id(&self) -> Option<AppInfoId> {
        self.id
    }
}

impl PartialEq for AppInfo {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl AggregateRoot for AppInfo {
    type Event = AppInfoEvent;

    fn pending_events(&self) -> &[AppInfoEvent] {
        self.events.as_slice()
    }

    fn drain_events(&mut self) -> Vec<AppInfoEvent> {
        self.events.drain()
    }
}

/// Event: an app entry was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfoRegistered {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub name: String,
}

/// Event: an app entry's metadata changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfoUpdated {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub name: String,
}

/// All app-info events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppInfoEvent {
    Registered(AppInfoRegistered),
    Updated(AppInfoUpdated),
}

impl DomainEvent for AppInfoEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AppInfoEvent::Registered(_) => "appinfo.app.registered",
            AppInfoEvent::Updated(_) => "appinfo.app.updated",
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            AppInfoEvent::Registered(e) => e.event_id,
            AppInfoEvent::Updated(e) => e.event_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AppInfoEvent::Registered(e) => e.occurred_at,
            AppInfoEvent::Updated(e) => e.occurred_at,
        }
    }
}
