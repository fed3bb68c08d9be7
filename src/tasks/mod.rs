//! # Task abstractions and group specifications.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for a zero-argument unit of work producing a fresh future per attempt
//! - [`TaskFn`] - async closure-backed task
//! - [`BlockingTaskFn`] - blocking closure run on tokio's blocking pool
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`GroupSpec`] - name + instance count + task + policies, ready to register

mod spec;
mod spec_builder;
mod task;
mod task_fn;

pub use spec::{GroupSpec, MAX_INSTANCES, clamp_instances};
pub use spec_builder::GroupSpecBuilder;
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::{BlockingTaskFn, TaskFn};
