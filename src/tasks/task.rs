//! # Task abstraction.
//!
//! A [`Task`] is the body every instance of a group runs. It takes no
//! arguments and returns nothing useful: the supervisor only cares whether an
//! attempt returned, returned `Err`, or panicked. Each call to
//! [`Task::spawn`] must produce a **new** future so the same task can run in
//! many slots at once and be relaunched after it ends.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// # Shared handle to a task object.
///
/// One `TaskRef` is shared by every slot of a group.
pub type TaskRef = Arc<dyn Task>;

/// # Zero-argument unit of work.
///
/// # Example
/// ```
/// use groupvisor::{BoxTaskFuture, Task, TaskError};
///
/// struct Heartbeat;
///
/// impl Task for Heartbeat {
///     fn spawn(&self) -> BoxTaskFuture {
///         Box::pin(async {
///             tokio::time::sleep(std::time::Duration::from_secs(1)).await;
///             Ok::<(), TaskError>(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Creates the future for one attempt.
    ///
    /// Panics inside the returned future are caught by the slot that polls it.
    fn spawn(&self) -> BoxTaskFuture;
}
