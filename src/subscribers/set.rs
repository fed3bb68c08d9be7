//! # Non-blocking event fan-out.
//!
//! ## Rules
//! - **Non-blocking**: `emit()` uses `try_send` and returns immediately
//! - **Per-subscriber FIFO**, no ordering across subscribers
//! - **Overflow**: the event is dropped for that subscriber only; `SubscriberOverflow` is published
//! - **Isolation**: a panicking subscriber is reported via `SubscriberPanicked` and keeps running
//!
//! Overflow events are never re-published when they themselves overflow.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::core::runner::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime. A worker ends when its
    /// queue is closed, i.e. when the set is dropped.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            tokio::spawn(Self::worker(sub, rx, bus.clone()));
            channels.push(SubscriberChannel { name, sender: tx });
        }
        Self { channels, bus }
    }

    async fn worker(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
        while let Some(ev) = rx.recv().await {
            let fut = sub.on_event(ev.as_ref());
            if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                bus.publish(Event::subscriber_panicked(
                    sub.name(),
                    panic_message(payload.as_ref()),
                ));
            }
        }
    }

    /// Returns `true` when no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: &Event) {
        if self.channels.is_empty() {
            return;
        }
        let event = Arc::new(event.clone());
        let is_overflow_evt = matches!(event.kind, EventKind::SubscriberOverflow);

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber blew up");
        }
        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_isolates_panics() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone(), Arc::new(Exploder)];
        let set = SubscriberSet::new(subs, bus.clone());

        set.emit(&Event::new(EventKind::InstanceStarting));
        set.emit(&Event::new(EventKind::InstanceExited));

        // The exploder keeps consuming after its first panic.
        for _ in 0..2 {
            let ev = rx.recv().await.expect("panic event");
            assert_eq!(ev.kind, EventKind::SubscriberPanicked);
            assert_eq!(ev.group.as_deref(), Some("exploder"));
            assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
        }

        for _ in 0..100 {
            if rec.0.lock().len() == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(
            *rec.0.lock(),
            vec![EventKind::InstanceStarting, EventKind::InstanceExited]
        );
        drop(set);
    }
}
