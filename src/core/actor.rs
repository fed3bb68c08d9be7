//! # SlotActor: supervises one slot of a group.
//!
//! The actor is the launch wrapper of a slot. Its first attempt is marked
//! running by [`TaskGroup::launch_one`](crate::core::group::TaskGroup) before
//! the actor is spawned; every later attempt is marked running by the actor
//! itself after the restart delay.
//!
//! ## Event flow
//! ```text
//! InstanceStarting → [run_once] → InstanceExited   ─┬─► RestartScheduled → [sleep] → InstanceStarting ...
//!                               → InstancePanicked ─┘
//!                                                   └─► InstanceStopped (policy forbids relaunch)
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; two attempts never share a slot.
//! - The slot is updated **before** the matching event is published.
//! - The consecutive-panic streak feeds the delay; a normal return resets it.

use std::sync::Arc;

use tokio::time;

use crate::core::group::TaskGroup;
use crate::core::runner::{TaskOutcome, run_once};
use crate::core::slot::InstanceSlot;
use crate::events::{Bus, Event, EventKind, RestartSource};

pub(crate) struct SlotActor {
    group: Arc<TaskGroup>,
    index: usize,
    bus: Bus,
}

impl SlotActor {
    pub(crate) fn new(group: Arc<TaskGroup>, index: usize, bus: Bus) -> Self {
        Self { group, index, bus }
    }

    fn slot(&self) -> &InstanceSlot {
        &self.group.slots()[self.index]
    }

    fn event(&self, kind: EventKind, attempt: u64) -> Event {
        Event::new(kind)
            .with_group(Arc::clone(self.group.shared_name()))
            .with_instance(self.index)
            .with_attempt(attempt)
    }

    /// Marks the slot running and announces the attempt.
    pub(crate) fn begin_attempt(&self, attempt: u64) {
        self.slot().mark_running();
        self.bus
            .publish(self.event(EventKind::InstanceStarting, attempt));
    }

    /// Runs attempts until the restart policy says stop.
    pub(crate) async fn run(self) {
        let restart = self.group.restart();
        let backoff = self.group.backoff();
        let mut attempt: u64 = 1;
        let mut streak: u32 = 0;

        loop {
            let outcome = run_once(self.group.task().as_ref()).await;
            let reason = outcome.summary().to_owned();

            let (source, relaunch) = match outcome {
                TaskOutcome::Completed => {
                    streak = 0;
                    self.slot().mark_exited();
                    self.bus
                        .publish(self.event(EventKind::InstanceExited, attempt));
                    (RestartSource::Exit, restart.restarts_after_exit())
                }
                TaskOutcome::Failed { diagnostic } => {
                    streak = streak.saturating_add(1);
                    self.slot().mark_panicked(diagnostic);
                    self.bus.publish(
                        self.event(EventKind::InstancePanicked, attempt)
                            .with_reason(reason),
                    );
                    (RestartSource::Panic, restart.restarts_after_panic())
                }
            };

            if !relaunch {
                self.bus.publish(
                    self.event(EventKind::InstanceStopped, attempt)
                        .with_source(source),
                );
                break;
            }

            let delay = backoff.next(streak.saturating_sub(1));
            self.bus.publish(
                self.event(EventKind::RestartScheduled, attempt)
                    .with_delay(delay)
                    .with_source(source),
            );
            time::sleep(delay).await;

            attempt += 1;
            self.begin_attempt(attempt);
        }
    }
}
