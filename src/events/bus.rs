//! # Event bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. Publishing
//! never blocks and never fails: with no receivers the event is dropped,
//! and receivers that lag skip the oldest events (`RecvError::Lagged`).
//!
//! ```text
//!   SlotActor #0 ──┐
//!   SlotActor #N ──┼──► Bus ──► subscriber_listener ──► SubscriberSet
//!   Supervisor   ──┘
//! ```

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers (fire-and-forget).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver for events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::GroupRegistered).with_group("nobody-listens"));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::GroupRegistered).with_group("seen"));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.group.as_deref(), Some("seen"));
    }
}
