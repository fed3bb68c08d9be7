use std::future::Future;

use crate::{
    BackoffPolicy, BlockingTaskFn, GroupSpec, RestartPolicy, TaskError, TaskFn, TaskRef,
};

/// Builder for [`GroupSpec`] with fluent API.
///
/// Starts with one instance, [`RestartPolicy::default`] and [`BackoffPolicy::default`].
#[derive(Clone, Debug)]
pub struct GroupSpecBuilder {
    name: String,
    instances: i64,
    restart: RestartPolicy,
    backoff: BackoffPolicy,
}

impl GroupSpecBuilder {
    /// Creates a new builder with the given group name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: 1,
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
        }
    }

    /// Sets the requested instance count (clamped to `1..=100` at registration).
    pub fn instances(mut self, instances: i64) -> Self {
        self.instances = instances;
        self
    }

    /// Sets the restart policy.
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Sets the restart policy from the two boolean switches.
    pub fn with_restart_flags(mut self, panic_restart: bool, loop_restart: bool) -> Self {
        self.restart = RestartPolicy::from_flags(panic_restart, loop_restart);
        self
    }

    /// Sets the delay applied before a relaunch.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Build from an async closure.
    pub fn build<F, Fut>(self, f: F) -> GroupSpec
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.build_from_task(TaskFn::arc(f))
    }

    /// Build from a blocking closure.
    pub fn build_blocking<F>(self, f: F) -> GroupSpec
    where
        F: Fn() -> Result<(), TaskError> + Send + Sync + 'static,
    {
        self.build_from_task(BlockingTaskFn::arc(f))
    }

    /// Build from an existing [`TaskRef`].
    pub fn build_from_task(self, task: TaskRef) -> GroupSpec {
        GroupSpec::new(self.name, self.instances, task, self.restart, self.backoff)
    }
}

impl GroupSpec {
    /// Creates a builder for constructing a [`GroupSpec`] with fluent API.
    pub fn builder(name: impl Into<String>) -> GroupSpecBuilder {
        GroupSpecBuilder::new(name)
    }
}
