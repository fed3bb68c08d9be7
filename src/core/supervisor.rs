//! # Supervisor: registers task groups and reports on them.
//!
//! The [`Supervisor`] owns the group registry, the event bus and the
//! subscriber set. It is an ordinary value: create as many as you like (one
//! per test, say) or use [`crate::global`] for a lazily created process-wide
//! one.
//!
//! ## High-level architecture
//! ```text
//! register(spec) ──► Registry lock ──► TaskGroup::new(spec)   (count clamped)
//!                                  └─► launch_all()
//!                                        ├─► slot 0: mark Running, spawn SlotActor
//!                                        ├─► slot 1: mark Running, spawn SlotActor
//!                                        └─► ...
//!
//! snapshot() ──► Registry lock: copy group list ──► unlock
//!            └─► for each group: for each slot: slot lock ──► SlotReport
//!
//! SlotActor ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use groupvisor::{Supervisor, SupervisorConfig, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(SupervisorConfig::default()).build();
//!
//!     sup.register_fn("ticker", 2, || async {
//!         tokio::time::sleep(Duration::from_secs(3600)).await;
//!         Ok::<(), TaskError>(())
//!     }, true, false)?;
//!
//!     let report = sup.snapshot();
//!     assert_eq!(report.groups[0].summary.running, 2);
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::warn;

use crate::config::SupervisorConfig;
use crate::core::builder::SupervisorBuilder;
use crate::core::group::TaskGroup;
use crate::core::registry::Registry;
use crate::error::{RegisterError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::policies::RestartPolicy;
use crate::report::{GroupReport, Report};
use crate::subscribers::SubscriberSet;
use crate::tasks::{GroupSpec, TaskFn};

/// Registers task groups, launches their instances and reports their status.
pub struct Supervisor {
    cfg: SupervisorConfig,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    registry: Registry,
    pub(crate) monitor_started: AtomicBool,
}

impl Supervisor {
    /// Returns a builder.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: SupervisorConfig, bus: Bus, subs: SubscriberSet) -> Self {
        Self {
            cfg,
            bus,
            subs: Arc::new(subs),
            registry: Registry::new(),
            monitor_started: AtomicBool::new(false),
        }
    }

    /// Forwards bus events to the subscriber set (no-op without subscribers).
    pub(crate) fn subscriber_listener(&self) {
        if self.subs.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "subscriber listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Configuration this supervisor was built with.
    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    /// Receiver for lifecycle events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registers a group and launches all of its instances.
    ///
    /// The instances are spawned before this returns; it never waits for
    /// them. A name that is already taken leaves the existing group alone
    /// and returns [`RegisterError::DuplicateName`].
    pub fn register(&self, spec: GroupSpec) -> Result<Arc<TaskGroup>, RegisterError> {
        let rt = match Handle::try_current() {
            Ok(rt) => rt,
            Err(_) => {
                return Err(self.reject(RegisterError::NoRuntime {
                    name: spec.name().to_owned(),
                }));
            }
        };

        let group = self
            .registry
            .insert_and_launch(&spec, |group| {
                group.launch_all(&rt, &self.bus);
            })
            .map_err(|e| self.reject(e))?;

        self.bus.publish(
            Event::new(EventKind::GroupRegistered)
                .with_group(Arc::clone(group.shared_name()))
                .with_instance(group.instances()),
        );
        Ok(group)
    }

    /// Registers an async closure with the two restart switches.
    ///
    /// `instances` is clamped to `1..=100`.
    pub fn register_fn<F, Fut>(
        &self,
        name: &str,
        instances: i64,
        f: F,
        panic_restart: bool,
        loop_restart: bool,
    ) -> Result<Arc<TaskGroup>, RegisterError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.register(GroupSpec::new(
            name,
            instances,
            TaskFn::arc(f),
            RestartPolicy::from_flags(panic_restart, loop_restart),
            self.cfg.backoff,
        ))
    }

    fn reject(&self, err: RegisterError) -> RegisterError {
        warn!(group = err.name(), error = %err, "task group registration rejected");
        self.bus.publish(
            Event::new(EventKind::GroupRejected)
                .with_group(err.name())
                .with_reason(err.as_label()),
        );
        err
    }

    /// Point-in-time status of every group, in registration order.
    ///
    /// The registry lock is held only to copy the group list; each slot is
    /// then read under its own lock.
    pub fn snapshot(&self) -> Report {
        let groups = self.registry.groups();
        Report {
            groups: groups.iter().map(|g| g.report()).collect(),
        }
    }

    /// Looks up a group by (trimmed) name.
    pub fn group(&self, name: &str) -> Option<Arc<TaskGroup>> {
        self.registry.get(name.trim())
    }

    /// Status of a single group.
    pub fn group_report(&self, name: &str) -> Option<GroupReport> {
        self.group(name).map(|g| g.report())
    }

    /// Group names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registry
            .groups()
            .iter()
            .map(|g| g.name().to_owned())
            .collect()
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no group has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::core::SlotStatus;
    use crate::events::RestartSource;
    use crate::policies::BackoffPolicy;

    fn supervisor() -> Arc<Supervisor> {
        Supervisor::builder(SupervisorConfig::default()).build()
    }

    async fn forever() -> Result<(), TaskError> {
        sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn give_up_after_50ms() -> Result<(), TaskError> {
        sleep(Duration::from_millis(50)).await;
        panic!("flaky worker gave up")
    }

    #[tokio::test(start_paused = true)]
    async fn instance_count_is_clamped() {
        let sup = supervisor();
        for (name, n, want) in [("neg", -5, 1), ("zero", 0, 1), ("mid", 7, 7), ("big", 250, 100)] {
            let g = sup.register_fn(name, n, forever, false, false).expect("register");
            assert_eq!(g.instances(), want, "{name}");
        }

        let report = sup.snapshot();
        assert_eq!(report.group("big").map(|g| g.summary.running), Some(100));
        assert_eq!(report.group("neg").map(|g| g.summary.total), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_name_changes_nothing() {
        let sup = supervisor();
        let starts = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&starts);
        sup.register_fn(
            "dup",
            2,
            move || {
                c.fetch_add(1, Ordering::SeqCst);
                forever()
            },
            true,
            false,
        )
        .expect("first");

        let c = Arc::clone(&starts);
        let err = sup
            .register_fn(
                " dup ",
                50,
                move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    forever()
                },
                false,
                true,
            )
            .expect_err("duplicate");
        assert!(matches!(err, RegisterError::DuplicateName { .. }));

        sleep(Duration::from_millis(10)).await;
        assert_eq!(starts.load(Ordering::SeqCst), 2);
        let group = sup.group("dup").expect("group");
        assert_eq!(group.instances(), 2);
        assert_eq!(group.restart(), RestartPolicy::OnPanic);
        assert_eq!(sup.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_instance_is_relaunched_after_delay() {
        let sup = supervisor();
        let group = sup
            .register_fn(
                "flaky",
                1,
                give_up_after_50ms,
                true,
                false,
            )
            .expect("register");
        let slot = group.slot(0).expect("slot");

        sleep(Duration::from_millis(10)).await;
        assert_eq!(slot.status(), SlotStatus::Running);

        sleep(Duration::from_millis(60)).await; // t = 70
        assert_eq!(slot.status(), SlotStatus::Panicked);
        assert_eq!(slot.failures(), 1);
        let last = slot.report().last_failure.expect("diagnostic");
        assert!(last.starts_with("flaky worker gave up"));

        sleep(Duration::from_millis(100)).await; // t = 170, relaunched at 150
        assert_eq!(slot.status(), SlotStatus::Running);
        assert!(slot.report().exited_at.is_none());

        sleep(Duration::from_millis(100)).await; // t = 270, second panic at 200
        assert_eq!(slot.status(), SlotStatus::Panicked);
        assert_eq!(slot.failures(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn panic_without_restart_stays_panicked() {
        let sup = supervisor();
        let runs = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&runs);
        let group = sup
            .register_fn(
                "once",
                3,
                move || {
                    c.fetch_add(1, Ordering::SeqCst);
                    give_up_after_50ms()
                },
                false,
                true,
            )
            .expect("register");

        sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        let report = group.report();
        assert_eq!(report.summary.panicked, 3);
        assert_eq!(report.summary.failures, 3);
        assert_eq!(report.summary.running, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn returning_instance_loops_with_delay() {
        let sup = supervisor();
        let runs = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&runs);
        let group = sup
            .register_fn(
                "looper",
                1,
                move || {
                    let c = Arc::clone(&c);
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        sleep(Duration::from_millis(10)).await;
                        Ok::<(), TaskError>(())
                    }
                },
                false,
                true,
            )
            .expect("register");
        let slot = group.slot(0).expect("slot");

        sleep(Duration::from_millis(50)).await; // exited at 10, next start at 110
        assert_eq!(slot.status(), SlotStatus::Exited);
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(65)).await; // t = 115
        assert_eq!(slot.status(), SlotStatus::Running);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(slot.failures(), 0);

        sleep(Duration::from_millis(1000)).await;
        // Each cycle is 10ms of work plus 100ms of delay.
        assert!(runs.load(Ordering::SeqCst) <= 11);
        assert!(runs.load(Ordering::SeqCst) >= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn returning_instance_without_loop_stays_exited() {
        let sup = supervisor();
        let group = sup
            .register_fn("oneshot", 4, || async { Ok::<(), TaskError>(()) }, true, false)
            .expect("register");

        sleep(Duration::from_secs(1)).await;
        let s = group.report().summary;
        assert_eq!((s.exited, s.running, s.panicked, s.failures), (4, 0, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn error_return_counts_as_failure() {
        let sup = supervisor();
        let group = sup
            .register_fn(
                "erring",
                1,
                || async { Err::<(), _>(TaskError::fail("upstream refused")) },
                false,
                false,
            )
            .expect("register");

        sleep(Duration::from_millis(10)).await;
        let slot = group.report().slots.remove(0);
        assert_eq!(slot.status, SlotStatus::Panicked);
        assert_eq!(slot.failures, 1);
        assert!(slot.failed_at.is_some());
        assert_eq!(slot.last_failure.as_deref(), Some("execution failed: upstream refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn summary_sums_to_total_while_churning() {
        let sup = supervisor();
        let n = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&n);
        sup.register_fn(
            "churn",
            20,
            move || {
                let k = c.fetch_add(1, Ordering::SeqCst);
                async move {
                    sleep(Duration::from_millis(3 + (k % 7) as u64)).await;
                    if k % 3 == 0 {
                        panic!("churn {k}");
                    }
                    Ok::<(), TaskError>(())
                }
            },
            true,
            true,
        )
        .expect("register");

        let mut last_failures = 0;
        for _ in 0..50 {
            sleep(Duration::from_millis(7)).await;
            let g = sup.group_report("churn").expect("group");
            let s = g.summary;
            assert_eq!(s.total, 20);
            assert_eq!(s.running + s.exited + s.panicked, s.total);
            assert!(s.failures >= s.panicked as u64);
            assert_eq!(g.slots.iter().map(|r| r.failures).sum::<u64>(), s.failures);
            assert!(s.failures >= last_failures);
            last_failures = s.failures;
        }
        assert!(last_failures > 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_keep_their_own_counts() {
        let sup = supervisor();
        let mut joins = Vec::new();
        for i in 0..16i64 {
            let sup = Arc::clone(&sup);
            joins.push(tokio::spawn(async move {
                sup.register_fn(&format!("g{i}"), i + 1, forever, false, false)
                    .map(|g| g.instances())
            }));
        }
        for j in joins {
            j.await.expect("join").expect("register");
        }

        let report = sup.snapshot();
        assert_eq!(report.groups.len(), 16);
        for i in 0..16usize {
            let g = report.group(&format!("g{i}")).expect("group");
            assert_eq!(g.summary.total, i + 1);
            assert_eq!(g.summary.running, i + 1);
        }
    }

    #[test]
    fn register_outside_runtime_is_rejected() {
        let sup = supervisor();
        let mut rx = sup.subscribe();
        let err = sup
            .register_fn("lonely", 1, forever, true, true)
            .expect_err("no runtime");

        assert!(matches!(err, RegisterError::NoRuntime { ref name } if name == "lonely"));
        assert!(sup.is_empty());
        let ev = rx.try_recv().expect("rejection event");
        assert_eq!(ev.kind, EventKind::GroupRejected);
        assert_eq!(ev.reason.as_deref(), Some("register_no_runtime"));
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_events_are_published_in_order() {
        let sup = supervisor();
        let mut rx = sup.subscribe();
        sup.register_fn(
            "evented",
            1,
            || async { Err::<(), _>(TaskError::fail("nope")) },
            true,
            false,
        )
        .expect("register");

        let mut kinds = Vec::new();
        while kinds.len() < 6 {
            let ev = rx.recv().await.expect("event");
            if ev.kind == EventKind::RestartScheduled {
                assert_eq!(ev.delay_ms, Some(100));
                assert_eq!(ev.restart_source, Some(RestartSource::Panic));
            }
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            [
                EventKind::InstanceStarting,
                EventKind::GroupRegistered,
                EventKind::InstancePanicked,
                EventKind::RestartScheduled,
                EventKind::InstanceStarting,
                EventKind::InstancePanicked,
            ]
        );
    }

    #[tokio::test]
    async fn oversized_restart_delay_still_schedules_restart() {
        let sup = supervisor();
        let mut rx = sup.subscribe();
        let spec = GroupSpec::new(
            "huge",
            1,
            TaskFn::arc(|| async { Err::<(), _>(TaskError::fail("nope")) }),
            RestartPolicy::OnPanic,
            BackoffPolicy::constant(Duration::from_secs(u64::MAX)),
        );
        sup.register(spec).expect("register");

        let mut kinds = Vec::new();
        while kinds.len() < 4 {
            let ev = rx.recv().await.expect("event");
            if ev.kind == EventKind::RestartScheduled {
                assert_eq!(ev.delay_ms, Some(u32::MAX));
            }
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            [
                EventKind::InstanceStarting,
                EventKind::GroupRegistered,
                EventKind::InstancePanicked,
                EventKind::RestartScheduled,
            ]
        );
        assert_eq!(sup.group_report("huge").map(|g| g.summary.panicked), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn names_and_lookups_use_trimmed_names() {
        let sup = supervisor();
        sup.register_fn("  beta ", 1, forever, false, false).expect("beta");
        sup.register_fn("alpha", 1, forever, false, false).expect("alpha");

        assert_eq!(sup.names(), ["beta", "alpha"]);
        assert!(sup.group(" beta").is_some());
        assert!(sup.group_report("gamma").is_none());
    }
}
