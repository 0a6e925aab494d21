//! In-process change notification for pharmacy inventory
//!
//! The batch service publishes an event whenever a batch enters a
//! pharmacist's inventory; subscribers (the SSE watch endpoint) use the
//! event only as a hint to refetch, so lossy delivery under lag is fine and
//! the aggregator re-derives everything from the current snapshot.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// A change to some pharmacist's received-batch set
#[derive(Debug, Clone, Serialize)]
pub struct InventoryEvent {
    pub pharmacist_id: Uuid,
    pub batch_id: Uuid,
}

/// Broadcast hub for inventory change events
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<InventoryEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an inventory change; dropped silently when nobody listens
    pub fn publish(&self, event: InventoryEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!("No inventory watchers: {}", e);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}
