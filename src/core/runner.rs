//! # Run a single attempt of a task.
//!
//! [`run_once`] is the crash-containment boundary of a slot. It polls one
//! attempt inside `catch_unwind` and turns every way the attempt can end
//! into a [`TaskOutcome`]:
//!
//! ```text
//! task.spawn().await ── Ok(())        ──► Completed
//!                    ├─ Err(e)        ──► Failed { diagnostic: e.to_string() }
//!                    └─ panic payload ──► Failed { diagnostic: message + backtrace }
//! ```
//!
//! ## Backtraces
//! `catch_unwind` only hands back the payload. To keep the panicking
//! frames, [`install_backtrace_hook`] chains a panic hook that stores a
//! forced backtrace in a thread-local. The future is polled on the thread
//! that panics and `catch_unwind` returns on that same thread, so the
//! capture is taken right after the catch without crossing threads.
//!
//! The thread-local is cleared before every poll of an attempt. A payload
//! rethrown with `resume_unwind` skips the hook, and must not pick up a
//! backtrace some unrelated, already-handled panic left on the thread.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::Cell;
use std::future::poll_fn;
use std::panic::AssertUnwindSafe;
use std::sync::Once;

use futures::FutureExt;

use crate::tasks::Task;

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task returned `Ok(())`.
    Completed,
    /// The task panicked or returned `Err`.
    Failed {
        /// Error or panic message, followed by a backtrace when one was captured.
        diagnostic: String,
    },
}

impl TaskOutcome {
    /// First line of the diagnostic, suitable for one-line log records.
    pub fn summary(&self) -> &str {
        match self {
            TaskOutcome::Completed => "",
            TaskOutcome::Failed { diagnostic } => diagnostic.lines().next().unwrap_or(""),
        }
    }
}

thread_local! {
    static LAST_BACKTRACE: Cell<Option<Backtrace>> = const { Cell::new(None) };
}

static HOOK: Once = Once::new();

/// Installs the backtrace-recording panic hook (once per process).
pub(crate) fn install_backtrace_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = LAST_BACKTRACE.try_with(|slot| slot.set(Some(Backtrace::force_capture())));
            previous(info);
        }));
    });
}

/// Extracts the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Forgets any backtrace recorded on this thread.
pub(crate) fn clear_backtrace() {
    let _ = LAST_BACKTRACE.try_with(|slot| slot.set(None));
}

/// Message plus the backtrace recorded on this thread, if any.
///
/// Must be called on the thread that caught the panic.
pub(crate) fn panic_diagnostic(payload: &(dyn Any + Send)) -> String {
    let msg = panic_message(payload);
    match LAST_BACKTRACE.try_with(Cell::take).ok().flatten() {
        Some(bt) => format!("{msg}\n==> {bt}"),
        None => msg,
    }
}

/// Executes one attempt of `task`, never letting a panic escape.
pub(crate) async fn run_once(task: &dyn Task) -> TaskOutcome {
    let attempt = AssertUnwindSafe(async move {
        clear_backtrace();
        let mut fut = task.spawn();
        poll_fn(|cx| {
            clear_backtrace();
            fut.as_mut().poll(cx)
        })
        .await
    });
    match attempt.catch_unwind().await {
        Ok(Ok(())) => TaskOutcome::Completed,
        Ok(Err(e)) => TaskOutcome::Failed {
            diagnostic: e.to_string(),
        },
        Err(payload) => TaskOutcome::Failed {
            diagnostic: panic_diagnostic(&*payload),
        },
    }
}
