use crate::events::Event;
use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out of engine events to whoever is listening (activity reporter, tests)
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: Event) -> Result<usize, broadcast::error::SendError<Event>> {
        self.tx.send(event)
    }

    /// Fire-and-forget publish; having no subscribers is not an error
    pub fn emit(&self, event: Event) {
        let prospect_id = event.prospect_id().to_string();
        if self.tx.send(event).is_err() {
            debug!("📭 [BUS] No subscribers for event on {}", prospect_id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
