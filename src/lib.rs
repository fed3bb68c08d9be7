//! # groupvisor
//!
//! **groupvisor** supervises long-running background tasks inside one
//! process. A task is registered as a named *group* with a fixed number of
//! instances; every instance runs as its own tokio task, its lifecycle is
//! tracked, panics are contained and recorded, and the instance is
//! relaunched according to the group's restart policy. At any time the
//! supervisor can produce a consistent text report of every group.
//!
//! It is not a job scheduler (no queueing, no work distribution) and not a
//! process manager. There is no cancellation: a group runs until the
//! process (or runtime) ends.
//!
//! ## Architecture
//! ```text
//!  register(GroupSpec)
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Supervisor                                                      │
//! │  - Registry  (name → TaskGroup, registration order)             │
//! │  - Bus       (broadcast lifecycle events)                       │
//! │  - SubscriberSet (fans events out to user subscribers)          │
//! └──────┬──────────────────────────────┬───────────────────────────┘
//!        ▼                              ▼
//! ┌──────────────┐               ┌──────────────┐
//! │ TaskGroup A  │               │ TaskGroup B  │    (slot array fixed at registration)
//! │ slot 0..n-1  │               │ slot 0..m-1  │
//! └──┬───────┬───┘               └──────┬───────┘
//!    ▼       ▼                          ▼
//!  SlotActor SlotActor ...           SlotActor        (one tokio task per slot)
//! ```
//!
//! ### Slot lifecycle
//! ```text
//! loop {
//!   ├─► mark Running, publish InstanceStarting
//!   ├─► run_once(task)            (catch_unwind: panics never escape)
//!   │       ├─ Completed ──► mark Exited,   publish InstanceExited
//!   │       └─ Failed    ──► mark Panicked, failures += 1, publish InstancePanicked
//!   ├─► policy forbids relaunch ──► publish InstanceStopped, exit (status is final)
//!   └─► publish RestartScheduled, sleep(delay = 100ms by default)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                          | Key types                                   |
//! |-------------------|------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Register groups, launch and relaunch instances.      | [`Supervisor`], [`TaskGroup`], [`GroupSpec`] |
//! | **Status**        | Point-in-time reports, text rendering.               | [`Report`], [`GroupReport`], [`SlotReport`]  |
//! | **Policies**      | Restart switches and restart delay.                  | [`RestartPolicy`], [`BackoffPolicy`]        |
//! | **Tasks**         | Async or blocking closures, or a custom [`Task`].    | [`TaskFn`], [`BlockingTaskFn`], [`TaskRef`] |
//! | **Events**        | Lifecycle events for logging/metrics.                | [`Event`], [`Subscribe`]                    |
//! | **Monitor**       | Plain-text HTTP status endpoint.                     | [`Supervisor::start_monitor`]               |
//! | **Errors**        | Typed registration, task and monitor errors.         | [`RegisterError`], [`TaskError`]            |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that logs every event through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use groupvisor::{GroupSpec, RestartPolicy, SlotStatus, Supervisor, SupervisorConfig, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(SupervisorConfig::default()).build();
//!
//!     let spec = GroupSpec::builder("consumers")
//!         .instances(3)
//!         .with_restart(RestartPolicy::OnPanic)
//!         .build(|| async {
//!             tokio::time::sleep(Duration::from_secs(60)).await;
//!             Ok::<(), TaskError>(())
//!         });
//!     let group = sup.register(spec)?;
//!
//!     assert_eq!(group.instances(), 3);
//!     assert!(group.slots().iter().all(|s| s.status() == SlotStatus::Running));
//!
//!     // A second registration under the same name is rejected.
//!     assert!(sup.register_fn("consumers", 1, || async { Ok::<(), TaskError>(()) }, false, false).is_err());
//!
//!     print!("{}", sup.snapshot());
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod monitor;
mod policies;
mod report;
mod subscribers;
mod tasks;

use std::sync::{Arc, OnceLock};

// ---- Public re-exports ----

pub use config::SupervisorConfig;
pub use core::{
    InstanceSlot, SlotStatus, Supervisor, SupervisorBuilder, TaskGroup, TaskOutcome,
};
pub use error::{MonitorError, RegisterError, TaskError};
pub use events::{Event, EventKind, RestartSource};
pub use policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
pub use report::{GroupReport, Report, SlotReport, Summary, format_time};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    BlockingTaskFn, BoxTaskFuture, GroupSpec, GroupSpecBuilder, MAX_INSTANCES, Task, TaskFn,
    TaskRef, clamp_instances,
};

// Optional: a built-in subscriber that logs every event through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

static GLOBAL: OnceLock<Arc<Supervisor>> = OnceLock::new();

/// Process-wide supervisor with default configuration and no subscribers.
///
/// Created on first use. Prefer building your own [`Supervisor`] and
/// passing it around; this exists for code that wants a single implicit
/// registry.
pub fn global() -> &'static Arc<Supervisor> {
    GLOBAL.get_or_init(|| Supervisor::builder(SupervisorConfig::default()).build())
}
