//! `prepdeck-events` — domain events and their post-commit dispatch.
//!
//! Aggregates buffer events while a request mutates them; after the owning
//! unit of work commits, the buffered events are published to in-process
//! listeners on a background worker, in buffer order.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod listener;
pub mod unit_of_work;

pub use bus::{EventBus, InProcessEventBus};
pub use envelope::EventEnvelope;
pub use event::{DomainEvent, EventId};
pub use listener::EventListener;
pub use unit_of_work::UnitOfWork;
