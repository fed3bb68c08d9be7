//! # Runtime events emitted by the supervisor and slot actors.
//!
//! [`EventKind`] classifies events in three groups:
//! - **Registration**: a group was accepted or rejected
//! - **Instance lifecycle**: starting, exited, panicked, restart scheduled, stopped for good
//! - **Infrastructure**: monitor started, subscriber overflow/panic
//!
//! ## Ordering guarantees
//! Each event carries a process-wide, monotonically increasing `seq`.
//! For one slot, events are published in lifecycle order because a slot's
//! attempts never overlap.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use groupvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RestartScheduled)
//!     .with_group("consumers")
//!     .with_instance(3)
//!     .with_delay(Duration::from_millis(100));
//!
//! assert_eq!(ev.group.as_deref(), Some("consumers"));
//! assert_eq!(ev.instance, Some(3));
//! assert_eq!(ev.delay_ms, Some(100));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration ===
    /// A group was registered and its instances launched.
    ///
    /// Sets: `group`, `instance` (= instance count).
    GroupRegistered,

    /// A registration was rejected (duplicate name or no runtime).
    ///
    /// Sets: `group`, `reason` (error label).
    GroupRejected,

    // === Instance lifecycle ===
    /// An instance is about to run its task.
    ///
    /// Sets: `group`, `instance`, `attempt` (1-based, per slot).
    InstanceStarting,

    /// The task returned normally.
    ///
    /// Sets: `group`, `instance`, `attempt`.
    InstanceExited,

    /// The task panicked or returned `Err`.
    ///
    /// Sets: `group`, `instance`, `attempt`, `reason` (first line of the diagnostic).
    InstancePanicked,

    /// The instance will be relaunched after a delay.
    ///
    /// Sets: `group`, `instance`, `attempt`, `delay_ms`, `restart_source`.
    RestartScheduled,

    /// The restart policy forbids relaunch; the slot keeps its last status forever.
    ///
    /// Sets: `group`, `instance`, `attempt`, `restart_source`.
    InstanceStopped,

    // === Infrastructure ===
    /// The status endpoint is listening.
    ///
    /// Sets: `reason` (bound address).
    MonitorStarted,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `group` (subscriber name), `reason` (panic message).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `group` (subscriber name), `reason`.
    SubscriberOverflow,
}

/// What ended the attempt that led to a restart decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartSource {
    /// The task returned normally.
    Exit,
    /// The task panicked or returned `Err`.
    Panic,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Group name (or subscriber name for subscriber events).
    pub group: Option<Arc<str>>,
    /// Slot index within the group.
    pub instance: Option<usize>,
    /// Attempt count for the slot (starting from 1).
    pub attempt: Option<u64>,
    /// Restart delay in milliseconds.
    pub delay_ms: Option<u32>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
    /// Outcome that triggered a restart decision.
    pub restart_source: Option<RestartSource>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            group: None,
            instance: None,
            attempt: None,
            delay_ms: None,
            reason: None,
            restart_source: None,
        }
    }

    /// Attaches a group name.
    #[inline]
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Attaches a slot index.
    #[inline]
    pub fn with_instance(mut self, index: usize) -> Self {
        self.instance = Some(index);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u64) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Marks what ended the attempt.
    #[inline]
    pub fn with_source(mut self, source: RestartSource) -> Self {
        self.restart_source = Some(source);
        self
    }

    /// Creates a subscriber overflow event.
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_group(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_group(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::InstanceStarting);
        let b = Event::new(EventKind::InstanceExited);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn huge_delay_saturates() {
        let ev = Event::new(EventKind::RestartScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
