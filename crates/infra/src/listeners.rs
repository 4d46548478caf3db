//! Stock event listeners.

use prepdeck_events::{EventEnvelope, EventListener};

/// Logs every published event.
pub struct AuditLogListener;

impl EventListener for AuditLogListener {
    fn name(&self) -> &str {
        "audit-log"
    }

    fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        tracing::info!(
            event_type = event.event_type(),
            event_id = %event.event_id(),
            aggregate_type = event.aggregate_type(),
            "domain event"
        );
        Ok(())
    }
}

/// Reacts to billing events only.
pub struct BillingLogListener;

impl EventListener for BillingLogListener {
    fn name(&self) -> &str {
        "billing-log"
    }

    fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()> {
        if !event.event_type().starts_with("billing.") {
            return Ok(());
        }
        tracing::info!(
            event_type = event.event_type(),
            payload = %event.payload(),
            "billing activity"
        );
        Ok(())
    }
}
