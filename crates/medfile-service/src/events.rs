//! Domain event publishing.

use tokio::sync::broadcast;
use tracing::trace;

use medfile_core::events::DomainEvent;

/// Broadcasts committed changes to whoever listens (notification/UI layer).
#[derive(Debug, Clone)]
pub struct EventPublisher {
    /// Broadcast sender.
    tx: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    /// Creates a publisher with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: impl Into<DomainEvent>) {
        if self.tx.send(event.into()).is_err() {
            trace!("No event subscribers");
        }
    }
}
