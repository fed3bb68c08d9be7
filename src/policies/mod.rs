//! Restart and delay policies for task groups.
//!
//! ## Contents
//! - [`RestartPolicy`] whether an instance is relaunched after it panics and/or returns
//! - [`BackoffPolicy`] how long to wait before the relaunch (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization that spreads out relaunches of sibling instances
//!
//! ## Quick wiring
//! ```text
//! GroupSpec { restart: RestartPolicy, backoff: BackoffPolicy, .. }
//!      └─► core::actor::SlotActor uses:
//!           - restart to decide relaunch/stop after each attempt
//!           - backoff.next(streak) to compute the pause before relaunch
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::Always` (persistent tasks are relaunched on panic and on return).
//! - `BackoffPolicy::default()` → constant 100ms, capped at 30s, no jitter.

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::RestartPolicy;
