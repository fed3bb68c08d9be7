//! # Task group specification.
//!
//! Defines [`GroupSpec`]: everything the supervisor needs to register a
//! group: name, instance count, the task, restart policy and restart delay.
//!
//! A spec can be created:
//! - **Explicitly** with [`GroupSpec::new`] (full control)
//! - **From config** with [`GroupSpec::with_defaults`] (inherit policies)
//! - **Fluently** with [`GroupSpec::builder`]
//!
//! ## Rules
//! - The name is trimmed on construction; names are case-sensitive.
//! - The instance count is kept as given and clamped by [`GroupSpec::instances`]
//!   to `1..=MAX_INSTANCES` (`<= 0` → 1, `> 100` → 100).

use crate::{
    config::SupervisorConfig,
    policies::{BackoffPolicy, RestartPolicy},
    tasks::task::TaskRef,
};

/// Upper bound on instances per group.
pub const MAX_INSTANCES: usize = 100;

/// Clamps a requested instance count into `1..=MAX_INSTANCES`.
///
/// ```
/// use groupvisor::clamp_instances;
///
/// assert_eq!(clamp_instances(-5), 1);
/// assert_eq!(clamp_instances(0), 1);
/// assert_eq!(clamp_instances(42), 42);
/// assert_eq!(clamp_instances(1_000), 100);
/// ```
pub fn clamp_instances(requested: i64) -> usize {
    requested.clamp(1, MAX_INSTANCES as i64) as usize
}

/// Specification for registering a task group.
///
/// ## Example
/// ```rust
/// use groupvisor::{BackoffPolicy, GroupSpec, RestartPolicy, SupervisorConfig, TaskError, TaskFn, TaskRef};
///
/// let task: TaskRef = TaskFn::arc(|| async { Ok::<(), TaskError>(()) });
///
/// let spec = GroupSpec::new(" consumers ", 4, task.clone(), RestartPolicy::OnPanic, BackoffPolicy::default());
/// assert_eq!(spec.name(), "consumers");
/// assert_eq!(spec.instances(), 4);
///
/// let cfg = SupervisorConfig::default();
/// let spec2 = GroupSpec::with_defaults("pollers", 0, task, &cfg);
/// assert_eq!(spec2.instances(), 1);
/// ```
#[derive(Clone)]
pub struct GroupSpec {
    name: String,
    requested: i64,
    task: TaskRef,
    restart: RestartPolicy,
    backoff: BackoffPolicy,
}

impl GroupSpec {
    /// Creates a group specification with explicit policies.
    pub fn new(
        name: impl AsRef<str>,
        instances: i64,
        task: TaskRef,
        restart: RestartPolicy,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_owned(),
            requested: instances,
            task,
            restart,
            backoff,
        }
    }

    /// Creates a group specification inheriting policies from `cfg`.
    pub fn with_defaults(
        name: impl AsRef<str>,
        instances: i64,
        task: TaskRef,
        cfg: &SupervisorConfig,
    ) -> Self {
        Self::new(name, instances, task, cfg.restart, cfg.backoff)
    }

    /// Trimmed group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective (clamped) number of instances.
    pub fn instances(&self) -> usize {
        clamp_instances(self.requested)
    }

    /// Instance count exactly as requested.
    pub fn requested_instances(&self) -> i64 {
        self.requested
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Returns the restart policy.
    pub fn restart(&self) -> RestartPolicy {
        self.restart
    }

    /// Returns the restart delay policy.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Returns a new spec with updated restart policy.
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Returns a new spec with updated delay policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns a new spec with updated instance count.
    pub fn with_instances(mut self, instances: i64) -> Self {
        self.requested = instances;
        self
    }
}

impl std::fmt::Debug for GroupSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSpec")
            .field("name", &self.name)
            .field("instances", &self.instances())
            .field("restart", &self.restart)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TaskError, TaskFn};

    #[test]
    fn clamp_covers_the_whole_range() {
        assert_eq!(clamp_instances(i64::MIN), 1);
        assert_eq!(clamp_instances(-1), 1);
        assert_eq!(clamp_instances(0), 1);
        assert_eq!(clamp_instances(1), 1);
        assert_eq!(clamp_instances(100), 100);
        assert_eq!(clamp_instances(101), 100);
        assert_eq!(clamp_instances(i64::MAX), 100);
        for n in 1..=100 {
            assert_eq!(clamp_instances(n), n as usize);
        }
    }

    #[test]
    fn name_is_trimmed_but_case_kept() {
        let task = TaskFn::arc(|| async { Ok::<(), TaskError>(()) });
        let spec = GroupSpec::new("\t Mixed Case \n", 3, task, RestartPolicy::Never, BackoffPolicy::default());
        assert_eq!(spec.name(), "Mixed Case");
        assert_eq!(spec.requested_instances(), 3);
    }
}
