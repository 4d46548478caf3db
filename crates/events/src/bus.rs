//! In-process event bus.

use std::sync::Arc;

use crate::envelope::EventEnvelope;
use crate::listener::EventListener;

/// Event publication seam.
///
/// The only implementation today is [`InProcessEventBus`]; the trait keeps
/// service wiring independent of the concrete bus.
pub trait EventBus: Send + Sync {
    /// Deliver one envelope to every listener, sequentially, in registration
    /// order. Listener failures are isolated and logged, never returned.
    fn publish(&self, envelope: &EventEnvelope);
}

impl<B> EventBus for Arc<B>
where
    B: EventBus + ?Sized,
{
    fn publish(&self, envelope: &EventEnvelope) {
        (**self).publish(envelope);
    }
}

/// Synchronous fan-out to registered listeners.
///
/// - No IO of its own
/// - Delivery order == registration order
/// - A failing listener never prevents later listeners from running
pub struct InProcessEventBus {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl InProcessEventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Registration order is delivery order.
    pub fn register(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for InProcessEventBus {
    fn publish(&self, envelope: &EventEnvelope) {
        for listener in &self.listeners {
            if let Err(err) = listener.on_event(envelope) {
                tracing::error!(
                    listener = listener.name(),
                    event_type = envelope.event_type(),
                    event_id = %envelope.event_id(),
                    error = %err,
                    "event listener failed; continuing with remaining listeners"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DomainEvent, EventId};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Ping {
        event_id: EventId,
        occurred_at: DateTime<Utc>,
        seq: u32,
    }

    impl DomainEvent for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }

        fn event_id(&self) -> EventId {
            self.event_id
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.occurred_at
        }
    }

    fn ping(seq: u32) -> EventEnvelope {
        let event = Ping {
            event_id: EventId::new(),
            occurred_at: Utc::now(),
            seq,
        };
        EventEnvelope::from_typed("test", &event).unwrap()
    }

    struct Recorder {
        name: &'static str,
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Recorder {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    impl EventListener for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(event.event_id().to_string());
            if self.fail {
                anyhow::bail!("listener exploded");
            }
            Ok(())
        }
    }

    #[test]
    fn delivers_to_listeners_in_registration_order() {
        let first = Recorder::new("first", false);
        let second = Recorder::new("second", false);

        let mut bus = InProcessEventBus::new();
        bus.register(first.clone());
        bus.register(second.clone());

        let a = ping(1);
        let b = ping(2);
        bus.publish(&a);
        bus.publish(&b);

        let expected = vec![a.event_id().to_string(), b.event_id().to_string()];
        assert_eq!(*first.seen.lock().unwrap(), expected);
        assert_eq!(*second.seen.lock().unwrap(), expected);
    }

    #[test]
    fn failing_listener_does_not_block_later_listeners() {
        let failing = Recorder::new("failing", true);
        let healthy = Recorder::new("healthy", false);

        let mut bus = InProcessEventBus::new();
        bus.register(failing.clone());
        bus.register(healthy.clone());

        bus.publish(&ping(1));

        assert_eq!(failing.seen.lock().unwrap().len(), 1);
        assert_eq!(healthy.seen.lock().unwrap().len(), 1);
    }
}
