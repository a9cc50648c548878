//! Notification bus port for cross-component lifecycle events.

use crate::board::domain::BoardEvent;
use tokio::sync::broadcast;

/// Receiving end of a bus subscription.
///
/// Dropping the receiver ends the subscription.
pub type BoardEventReceiver = broadcast::Receiver<BoardEvent>;

/// Application-wide publish/subscribe channel, injected into the board.
pub trait NotificationBus: Send + Sync {
    /// Delivers an event to every current subscriber.
    fn publish(&self, event: BoardEvent);

    /// Opens a subscription that receives every event published after this
    /// call.
    fn subscribe(&self) -> BoardEventReceiver;
}
