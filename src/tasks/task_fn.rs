//! # Closure-backed tasks.
//!
//! [`TaskFn`] wraps `F: Fn() -> Fut` and calls it once per attempt, so each
//! attempt owns its own future and no state leaks between relaunches. Shared
//! state must be put behind an `Arc` explicitly inside the closure.
//!
//! [`BlockingTaskFn`] wraps `F: Fn() -> Result<(), TaskError>` for bodies that
//! block a thread (sync I/O, CPU loops). Each attempt runs on tokio's blocking
//! pool; a panic there is caught on the blocking thread itself so its
//! backtrace is preserved.
//!
//! ## Example
//! ```rust
//! use groupvisor::{BlockingTaskFn, TaskError, TaskFn, TaskRef};
//!
//! let poller: TaskRef = TaskFn::arc(|| async {
//!     // poll something forever...
//!     Ok::<_, TaskError>(())
//! });
//!
//! let reader: TaskRef = BlockingTaskFn::arc(|| {
//!     // std::io::stdin().read_line(..)
//!     Ok::<_, TaskError>(())
//! });
//! # let _ = (poller, reader);
//! ```

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::core::runner::{clear_backtrace, panic_diagnostic};
use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task};

/// Async closure-backed task.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new closure-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn spawn(&self) -> BoxTaskFuture {
        Box::pin((self.f)())
    }
}

/// Blocking closure-backed task.
pub struct BlockingTaskFn<F> {
    f: Arc<F>,
}

impl<F> BlockingTaskFn<F> {
    /// Creates a new blocking task.
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Task for BlockingTaskFn<F>
where
    F: Fn() -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn spawn(&self) -> BoxTaskFuture {
        let f = Arc::clone(&self.f);
        Box::pin(async move {
            let joined = tokio::task::spawn_blocking(move || {
                clear_backtrace();
                catch_unwind(AssertUnwindSafe(|| f())).unwrap_or_else(|payload| {
                    Err(TaskError::Panicked {
                        diagnostic: panic_diagnostic(payload.as_ref()),
                    })
                })
            })
            .await;

            match joined {
                Ok(res) => res,
                Err(e) => Err(TaskError::fail(format!("blocking worker lost: {e}"))),
            }
        })
    }
}
