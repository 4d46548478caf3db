//! Listener contract for in-process event consumers.

use crate::envelope::EventEnvelope;

/// An in-process event listener.
///
/// Listeners run after the triggering transaction has committed, so a
/// listener error can no longer affect the original caller. The bus isolates
/// and logs per-listener failures; implementations should not rely on a
/// failure reaching anyone.
pub trait EventListener: Send + Sync {
    /// Listener name used in logs.
    fn name(&self) -> &str;

    /// Handle one published event.
    fn on_event(&self, event: &EventEnvelope) -> anyhow::Result<()>;
}
