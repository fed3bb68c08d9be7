//! # LogWriter: lifecycle events as `tracing` records
//!
//! Routine transitions are logged at `debug`, panics and overflows at
//! `warn`, registration and monitor startup at `info`.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO  groupvisor: registered group="consumers" instances=4
//! DEBUG groupvisor: starting group="consumers" instance=2 attempt=1
//! WARN  groupvisor: panicked group="consumers" instance=2 attempt=1 reason="boom"
//! DEBUG groupvisor: restart scheduled group="consumers" instance=2 delay_ms=100
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let group = e.group.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::GroupRegistered => {
                info!(target: "groupvisor", group, instances = e.instance, "registered");
            }
            EventKind::GroupRejected => {
                warn!(target: "groupvisor", group, reason, "registration rejected");
            }
            EventKind::InstanceStarting => {
                debug!(target: "groupvisor", group, instance = e.instance, attempt = e.attempt, "starting");
            }
            EventKind::InstanceExited => {
                debug!(target: "groupvisor", group, instance = e.instance, attempt = e.attempt, "exited");
            }
            EventKind::InstancePanicked => {
                warn!(target: "groupvisor", group, instance = e.instance, attempt = e.attempt, reason, "panicked");
            }
            EventKind::RestartScheduled => {
                debug!(target: "groupvisor", group, instance = e.instance, delay_ms = e.delay_ms, source = ?e.restart_source, "restart scheduled");
            }
            EventKind::InstanceStopped => {
                info!(target: "groupvisor", group, instance = e.instance, source = ?e.restart_source, "stopped; restart policy forbids relaunch");
            }
            EventKind::MonitorStarted => {
                info!(target: "groupvisor", addr = reason, "monitor listening");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "groupvisor", subscriber = group, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "groupvisor", subscriber = group, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
