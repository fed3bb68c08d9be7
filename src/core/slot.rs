//! # Instance slot: lifecycle state of one running copy of a task.
//!
//! ```text
//! Init ──► Running ──► Exited   ──(restart after exit)──► Running
//!                  └─► Panicked ──(restart after panic)─► Running
//! ```
//!
//! All fields sit in one `SlotState` behind one lock, so a reader sees the
//! status, timestamps and failure counter of the same transition. Only the
//! owning slot actor mutates a slot; everybody else reads [`SlotReport`]s.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::report::SlotReport;

/// Lifecycle status of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    /// Created, never launched.
    #[default]
    Init,
    /// The task body is executing.
    Running,
    /// The task body returned normally.
    Exited,
    /// The task body panicked or returned `Err`.
    Panicked,
}

impl SlotStatus {
    /// Human-readable label used in text reports.
    pub fn label(self) -> &'static str {
        match self {
            SlotStatus::Init => "not started",
            SlotStatus::Running => "running",
            SlotStatus::Exited => "exited",
            SlotStatus::Panicked => "panicked",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Default)]
struct SlotState {
    status: SlotStatus,
    started_at: Option<chrono::DateTime<Local>>,
    exited_at: Option<chrono::DateTime<Local>>,
    failed_at: Option<chrono::DateTime<Local>>,
    failures: u64,
    last_failure: Option<String>,
}

/// One slot of a [`TaskGroup`](crate::TaskGroup).
#[derive(Debug)]
pub struct InstanceSlot {
    index: usize,
    group: Arc<str>,
    state: Mutex<SlotState>,
}

impl InstanceSlot {
    pub(crate) fn new(group: Arc<str>, index: usize) -> Self {
        Self {
            index,
            group,
            state: Mutex::new(SlotState::default()),
        }
    }

    /// Index within the group.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the owning group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Current status.
    pub fn status(&self) -> SlotStatus {
        self.state.lock().status
    }

    /// Cumulative failures since the slot was created.
    pub fn failures(&self) -> u64 {
        self.state.lock().failures
    }

    /// Consistent copy of every field.
    pub fn report(&self) -> SlotReport {
        let s = self.state.lock();
        SlotReport {
            index: self.index,
            group: Arc::clone(&self.group),
            status: s.status,
            started_at: s.started_at,
            exited_at: s.exited_at,
            failed_at: s.failed_at,
            failures: s.failures,
            last_failure: s.last_failure.clone(),
        }
    }

    pub(crate) fn mark_running(&self) {
        let mut s = self.state.lock();
        s.status = SlotStatus::Running;
        s.started_at = Some(Local::now());
        s.exited_at = None;
    }

    pub(crate) fn mark_exited(&self) {
        let mut s = self.state.lock();
        s.status = SlotStatus::Exited;
        s.exited_at = Some(Local::now());
    }

    /// Records a failure and returns the new cumulative count.
    pub(crate) fn mark_panicked(&self, diagnostic: String) -> u64 {
        let mut s = self.state.lock();
        s.status = SlotStatus::Panicked;
        s.failed_at = Some(Local::now());
        s.failures = s.failures.saturating_add(1);
        s.last_failure = Some(diagnostic);
        s.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_init_and_empty() {
        let slot = InstanceSlot::new(Arc::from("g"), 3);
        let r = slot.report();
        assert_eq!(r.index, 3);
        assert_eq!(&*r.group, "g");
        assert_eq!(r.status, SlotStatus::Init);
        assert!(r.started_at.is_none() && r.exited_at.is_none() && r.failed_at.is_none());
        assert_eq!(r.failures, 0);
        assert!(r.last_failure.is_none());
    }

    #[test]
    fn restart_clears_exit_time_but_keeps_failure_history() {
        let slot = InstanceSlot::new(Arc::from("g"), 0);
        slot.mark_running();
        slot.mark_exited();
        assert!(slot.report().exited_at.is_some());

        slot.mark_running();
        assert_eq!(slot.mark_panicked("first".into()), 1);
        slot.mark_running();
        assert_eq!(slot.mark_panicked("second".into()), 2);
        slot.mark_running();

        let r = slot.report();
        assert_eq!(r.status, SlotStatus::Running);
        assert!(r.exited_at.is_none());
        assert!(r.failed_at.is_some());
        assert_eq!(r.failures, 2);
        assert_eq!(r.last_failure.as_deref(), Some("second"));
    }

    #[test]
    fn concurrent_failures_are_all_counted() {
        let slot = Arc::new(InstanceSlot::new(Arc::from("g"), 0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        slot.mark_panicked(String::new());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }
        assert_eq!(slot.failures(), 800);
    }
}
