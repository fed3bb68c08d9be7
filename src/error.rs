//! Error types used by the groupvisor runtime and tasks.
//!
//! This module defines three error enums:
//!
//! - [`RegisterError`]: a group could not be registered with the supervisor.
//! - [`TaskError`]: a task body reported a failure instead of panicking.
//! - [`MonitorError`]: the status endpoint could not be started.
//!
//! All of them provide `as_label` (stable snake_case for logs/metrics).

use std::net::SocketAddr;

use thiserror::Error;

/// # Errors produced by [`Supervisor::register`](crate::Supervisor::register).
///
/// Registration failures never affect groups that are already running.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegisterError {
    /// A group with this (trimmed) name is already registered.
    ///
    /// The existing group keeps its slots and policy; nothing new is started.
    #[error("task group {name:?} is already registered")]
    DuplicateName {
        /// The trimmed name that collided.
        name: String,
    },

    /// `register` was called outside of a tokio runtime, so instances cannot be spawned.
    #[error("no tokio runtime available to launch task group {name:?}")]
    NoRuntime {
        /// The trimmed name of the rejected group.
        name: String,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use groupvisor::RegisterError;
    ///
    /// let err = RegisterError::DuplicateName { name: "worker".into() };
    /// assert_eq!(err.as_label(), "register_duplicate_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::DuplicateName { .. } => "register_duplicate_name",
            RegisterError::NoRuntime { .. } => "register_no_runtime",
        }
    }

    /// Returns the group name the failed registration referred to.
    pub fn name(&self) -> &str {
        match self {
            RegisterError::DuplicateName { name } | RegisterError::NoRuntime { name } => name,
        }
    }
}

/// # Errors returned by task bodies.
///
/// A task that returns `Err` is treated exactly like a task that panicked:
/// the slot becomes `Panicked`, its failure counter grows and the message is
/// kept as the last failure diagnostic.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task body panicked somewhere the slot's own unwind guard could not see
    /// (e.g. on the blocking pool) and the panic was converted at that point.
    #[error("{diagnostic}")]
    Panicked {
        /// Panic message plus captured backtrace.
        diagnostic: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }
}

/// # Errors produced while starting the status endpoint.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The listener socket could not be bound.
    #[error("failed to bind monitor on {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bound listener could not report its local address.
    #[error("monitor listener has no local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

impl MonitorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            MonitorError::Bind { .. } => "monitor_bind",
            MonitorError::LocalAddr(_) => "monitor_local_addr",
        }
    }
}
