//! Unit of work: post-commit event dispatch coordinator.
//!
//! Per-transaction lifecycle: an aggregate mutation appends events to its own
//! buffer (pending); a service drains the buffer into the unit of work once
//! its repository writes succeeded (committed); `commit` hands the collected
//! envelopes to a background worker that publishes them to the bus in buffer
//! order (dispatched) and then drops them (cleared). Dropping the unit of
//! work without committing publishes nothing.

use std::sync::Arc;

use prepdeck_core::AggregateRoot;
use tokio::task::JoinHandle;

use crate::bus::EventBus;
use crate::envelope::EventEnvelope;
use crate::event::DomainEvent;

/// Collects the events of the aggregates touched by one logical transaction
/// and publishes them after commit.
///
/// Dispatch runs on a separate worker task, decoupled from the request
/// handler. The returned handle is awaited only by tests; callers fire and
/// forget.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    pending: Vec<EventEnvelope>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Drain an aggregate's buffered events into this unit of work.
    ///
    /// Envelope order follows the aggregate's buffer order; collecting from
    /// several aggregates preserves per-aggregate order but implies no
    /// ordering across aggregates.
    pub fn collect<A>(&mut self, aggregate_type: &str, aggregate: &mut A)
    where
        A: AggregateRoot,
        A::Event: DomainEvent,
    {
        for event in aggregate.drain_events() {
            match EventEnvelope::from_typed(aggregate_type, &event) {
                Ok(envelope) => self.pending.push(envelope),
                Err(err) => {
                    tracing::error!(
                        aggregate_type,
                        error = %err,
                        "failed to serialize domain event; dropping it"
                    );
                }
            }
        }
    }

    /// Envelopes collected so far, in dispatch order.
    pub fn pending(&self) -> &[EventEnvelope] {
        &self.pending
    }

    /// Publish all collected envelopes on a background worker, sequentially,
    /// in collection order.
    ///
    /// Listener failures are handled inside the bus and never reach the
    /// committing caller.
    pub fn commit<B>(self, bus: &Arc<B>) -> JoinHandle<()>
    where
        B: EventBus + ?Sized + 'static,
    {
        let bus = Arc::clone(bus);
        let pending = self.pending;
        tokio::spawn(async move {
            for envelope in &pending {
                bus.publish(envelope);
            }
        })
    }
}
