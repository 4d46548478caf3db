//! Account entity + its domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prepdeck_auth::{PrincipalId, Role};
use prepdeck_core::{AccountId, AggregateRoot, DomainError, DomainResult, Entity, EventBuffer, same_identity};
use prepdeck_events::{DomainEvent, EventId};

/// A registered user account.
///
/// The numeric key is assigned by the repository on first save; the identity
/// provider's subject string links the account to its principal.
#[derive(Debug, Clone)]
pub struct Account {
    id: Option<AccountId>,
    subject: PrincipalId,
    email: Option<String>,
    display_name: String,
    role: Role,
    created_at: DateTime<Utc>,
    events: EventBuffer<AccountEvent>,
}

impl Account {
    /// Register a new account. Records [`AccountRegistered`].
    pub fn register(
        subject: PrincipalId,
        email: Option<String>,
        display_name: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(DomainError::validation("display name must not be blank"));
        }

        let mut account = Self {
            id: None,
            subject: subject.clone(),
            email: email.clone(),
            display_name,
            role,
            created_at: now,
            events: EventBuffer::new(),
        };
        account.events.record(AccountEvent::Registered(AccountRegistered {
            event_id: EventId::new(),
            occurred_at: now,
            subject,
            email,
        }));
        Ok(account)
    }

    /// Rebuild an account from its stored row. Does not record events.
    pub fn hydrate(
        id: AccountId,
        subject: PrincipalId,
        email: Option<String>,
        display_name: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            subject,
            email,
            display_name,
            role,
            created_at,
            events: EventBuffer::new(),
        }
    }

    /// Called by the repository once a key has been assigned.
    pub fn assign_id(&mut self, id: AccountId) {
        self.id = Some(id);
    }

    pub fn subject(&self) -> &PrincipalId {
        &self.subject
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> Option<AccountId> {
        self.id
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl AggregateRoot for Account {
    type Event = AccountEvent;

    fn pending_events(&self) -> &[AccountEvent] {
        self.events.as_slice()
    }

    fn drain_events(&mut self) -> Vec<AccountEvent> {
        self.events.drain()
    }
}

/// Event: a new account was registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRegistered {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub subject: PrincipalId,
    pub email: Option<String>,
}

/// All account events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountEvent {
    Registered(AccountRegistered),
}

impl DomainEvent for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Registered(_) => "accounts.account.registered",
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            AccountEvent::Registered(e) => e.event_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::Registered(e) => e.occurred_at,
        }
    }
}
