//! Event bus for history notifications
//!
//! Observers (typically the subtitle view) subscribe to receive one event per
//! registered action or per undo/redo batch, and use the payload's row deltas
//! to decide which rows and cells to refresh.
//!
//! # Example
//!
//! ```rust
//! use subedit_history::bus::EventBus;
//!
//! let bus = EventBus::new();
//! let subscriber = bus.subscribe();
//! assert_eq!(bus.subscriber_count(), 1);
//! drop(subscriber);
//! ```

pub mod events;

pub use events::HistoryEvent;

use tokio::sync::broadcast;

/// Default number of buffered events per subscriber
pub const DEFAULT_CAPACITY: usize = 256;

/// Broadcast channel carrying [`HistoryEvent`]s
///
/// Cloning the bus shares the underlying channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<HistoryEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    ///
    /// `capacity` must be greater than zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Non-blocking. When a subscriber lags behind, its oldest events are
    /// dropped.
    pub fn publish(&self, event: HistoryEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
