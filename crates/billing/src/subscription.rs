//! Subscription aggregate + its domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prepdeck_core::{
    AccountId, AggregateRoot, DomainError, DomainResult, Entity, EventBuffer, numeric_id,
    same_identity,
};
use prepdeck_events::{DomainEvent, EventId};

use crate::plan::PlanId;

numeric_id!(SubscriptionId, "SubscriptionId");

/// Subscription lifecycle states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Expired,
}

/// An account's subscription to a plan.
///
/// Business methods append events to the buffer; publication happens after
/// the owning unit of work commits.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: Option<SubscriptionId>,
    account_id: AccountId,
    plan_id: PlanId,
    status: SubscriptionStatus,
    started_at: DateTime<Utc>,
    events: EventBuffer<SubscriptionEvent>,
}

impl Subscription {
    /// Start a new subscription. Records [`SubscriptionStarted`].
    pub fn start(account_id: AccountId, plan_id: PlanId, now: DateTime<Utc>) -> Self {
        let mut subscription = Self {
            id: None,
            account_id,
            plan_id,
            status: SubscriptionStatus::Active,
            started_at: now,
            events: EventBuffer::new(),
        };
        subscription
            .events
            .record(SubscriptionEvent::Started(SubscriptionStarted {
                event_id: EventId::new(),
                occurred_at: now,
                account_id,
                plan_id,
            }));
        subscription
    }

    /// Rebuild from a stored row. Does not record events.
    pub fn hydrate(
        id: SubscriptionId,
        account_id: AccountId,
        plan_id: PlanId,
        status: SubscriptionStatus,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            account_id,
            plan_id,
            status,
            started_at,
            events: EventBuffer::new(),
        }
    }

    pub fn assign_id(&mut self, id: SubscriptionId) {
        self.id = Some(id);
    }

    /// Move to another plan. Records [`SubscriptionPlanChanged`].
    pub fn change_plan(&mut self, new_plan_id: PlanId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != SubscriptionStatus::Active {
            return Err(DomainError::conflict("subscription is not active"));
        }
        if self.plan_id == new_plan_id {
            return Err(DomainError::conflict("subscription is already on that plan"));
        }

        let old_plan_id = self.plan_id;
        self.plan_id = new_plan_id;
        self.events
            .record(SubscriptionEvent::PlanChanged(SubscriptionPlanChanged {
                event_id: EventId::new(),
                occurred_at: now,
                account_id: self.account_id,
                old_plan_id,
                new_plan_id,
            }));
        Ok(())
    }

    /// Cancel the subscription. Records [`SubscriptionCanceled`].
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == SubscriptionStatus::Canceled {
            return Err(DomainError::conflict("subscription is already canceled"));
        }

        self.status = SubscriptionStatus::Canceled;
        self.events
            .record(SubscriptionEvent::Canceled(SubscriptionCanceled {
                event_id: EventId::new(),
                occurred_at: now,
                account_id: self.account_id,
            }));
        Ok(())
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Entity for Subscription {
    type Id = SubscriptionId;

    fn id(&self) -> Option<SubscriptionId> {
        self.id
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl AggregateRoot for Subscription {
    type Event = SubscriptionEvent;

    fn pending_events(&self) -> &[SubscriptionEvent] {
        self.events.as_slice()
    }

    fn drain_events(&mut self) -> Vec<SubscriptionEvent> {
        self.events.drain()
    }
}

/// Event: a subscription was started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStarted {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub account_id: AccountId,
    pub plan_id: PlanId,
}

/// Event: a subscription moved to another plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlanChanged {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub account_id: AccountId,
    pub old_plan_id: PlanId,
    pub new_plan_id: PlanId,
}

/// Event: a subscription was canceled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCanceled {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub account_id: AccountId,
}

/// All subscription events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubscriptionEvent {
    Started(SubscriptionStarted),
    PlanChanged(SubscriptionPlanChanged),
    Canceled(SubscriptionCanceled),
}

impl DomainEvent for SubscriptionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SubscriptionEvent::Started(_) => "billing.subscription.started",
            SubscriptionEvent::PlanChanged(_) => "billing.subscription.plan_changed",
            SubscriptionEvent::Canceled(_) => "billing.subscription.canceled",
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            SubscriptionEvent::Started(e) => e.event_id,
            SubscriptionEvent::PlanChanged(e) => e.event_id,
            SubscriptionEvent::Canceled(e) => e.event_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SubscriptionEvent::Started(e) => e.occurred_at,
            SubscriptionEvent::PlanChanged(e) => e.occurred_at,
            SubscriptionEvent::Canceled(e) => e.occurred_at,
        }
    }
}
