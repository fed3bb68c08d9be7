//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the settings shared by every group a
//! supervisor runs.
//!
//! Config is used in two ways:
//! 1. **Supervisor creation**: `Supervisor::builder(config).build()`
//! 2. **GroupSpec defaults**: `GroupSpec::with_defaults(name, n, task, &config)`
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → treated as 1 (the bus never accepts a zero-sized ring)

use crate::policies::{BackoffPolicy, RestartPolicy};

/// Configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `restart`: default restart policy for `GroupSpec::with_defaults`
/// - `backoff`: default restart delay for `GroupSpec::with_defaults`
/// - `capture_backtraces`: install the process-wide panic hook that records
///   the panicking thread's backtrace into the slot's failure diagnostic
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Capacity of the event bus broadcast channel.
    ///
    /// Slow consumers that fall more than `bus_capacity` events behind skip
    /// the oldest ones.
    pub bus_capacity: usize,

    /// Default restart policy for groups.
    pub restart: RestartPolicy,

    /// Default delay before an instance is relaunched.
    pub backoff: BackoffPolicy,

    /// Record a backtrace for every caught panic.
    ///
    /// The hook chains to whatever hook was installed before, so the default
    /// "thread panicked at" message is still printed.
    pub capture_backtraces: bool,
}

impl SupervisorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `restart = RestartPolicy::Always`
    /// - `backoff = BackoffPolicy::default()` (constant 100ms)
    /// - `capture_backtraces = true`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
            capture_backtraces: true,
        }
    }
}
