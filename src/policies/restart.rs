//! # Restart policies for instance slots.
//!
//! [`RestartPolicy`] decides what a slot does once an attempt is over.
//! The two independent questions are "relaunch after a panic?" and
//! "relaunch after a normal return?", which gives four variants:
//!
//! ```text
//!                     │ returned normally │ panicked / Err
//! ────────────────────┼───────────────────┼────────────────
//! Never               │ stays Exited      │ stays Panicked
//! OnPanic             │ stays Exited      │ relaunch
//! OnExit              │ relaunch          │ stays Panicked
//! Always              │ relaunch          │ relaunch
//! ```

/// Policy controlling whether an instance is relaunched after an attempt ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Run once; the slot keeps its terminal status.
    Never,
    /// Relaunch only after a panic (or an `Err` return).
    OnPanic,
    /// Relaunch only after a normal return; a panic is terminal.
    OnExit,
    /// Relaunch after both outcomes (default).
    #[default]
    Always,
}

impl RestartPolicy {
    /// Builds a policy from the two boolean switches.
    ///
    /// ```
    /// use groupvisor::RestartPolicy;
    ///
    /// assert_eq!(RestartPolicy::from_flags(true, false), RestartPolicy::OnPanic);
    /// assert_eq!(RestartPolicy::from_flags(false, true), RestartPolicy::OnExit);
    /// ```
    pub fn from_flags(panic_restart: bool, loop_restart: bool) -> Self {
        match (panic_restart, loop_restart) {
            (false, false) => RestartPolicy::Never,
            (true, false) => RestartPolicy::OnPanic,
            (false, true) => RestartPolicy::OnExit,
            (true, true) => RestartPolicy::Always,
        }
    }

    /// Returns `true` if a panicked instance is relaunched.
    #[inline]
    pub fn restarts_after_panic(self) -> bool {
        matches!(self, RestartPolicy::OnPanic | RestartPolicy::Always)
    }

    /// Returns `true` if an instance that returned normally is relaunched.
    #[inline]
    pub fn restarts_after_exit(self) -> bool {
        matches!(self, RestartPolicy::OnExit | RestartPolicy::Always)
    }
}
