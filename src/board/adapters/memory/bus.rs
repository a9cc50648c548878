//! In-process notification bus backed by a tokio broadcast channel.

use crate::board::{
    config::BoardConfig,
    domain::BoardEvent,
    ports::{BoardEventReceiver, NotificationBus},
};
use tokio::sync::broadcast;

/// Default number of undelivered events a slow subscriber may lag behind.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Broadcast bus shared by every component of one process.
#[derive(Debug, Clone)]
pub struct InProcessNotificationBus {
    sender: broadcast::Sender<BoardEvent>,
}

impl InProcessNotificationBus {
    /// Creates a bus whose subscribers may lag `capacity` events behind.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Creates a bus sized by [`BoardConfig::bus_capacity`].
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.bus_capacity)
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InProcessNotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl NotificationBus for InProcessNotificationBus {
    fn publish(&self, event: BoardEvent) {
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::trace!(event = %event.kind, receivers, "bus event published");
            }
            Err(_) => tracing::trace!(event = %event.kind, "bus event published with no subscribers"),
        }
    }

    fn subscribe(&self) -> BoardEventReceiver {
        self.sender.subscribe()
    }
}
