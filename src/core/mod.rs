//! Runtime core: registry, groups, slots and the launch wrapper.
//!
//! The public API from this module is [`Supervisor`] (with its builder),
//! [`TaskGroup`], [`InstanceSlot`], [`SlotStatus`] and [`TaskOutcome`].
//!
//! Internal modules:
//! - [`runner`]: executes one attempt and contains panics;
//! - [`actor`]: per-slot loop applying restart policy and delay;
//! - [`group`]: fixed pool of slots sharing a task;
//! - [`slot`]: lock-protected lifecycle state of one instance;
//! - [`registry`]: name → group map with registration order;
//! - [`supervisor`]: registration, snapshots, event wiring.
//!
//! ## Lock order
//! registry → slot. Groups have no lock (their slot array is immutable).
//! No lock is held across an `.await`, and the registry lock is never held
//! while a slot is read.

mod actor;
mod builder;
mod group;
mod registry;
pub(crate) mod runner;
mod slot;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use group::TaskGroup;
pub use runner::TaskOutcome;
pub use slot::{InstanceSlot, SlotStatus};
pub use supervisor::Supervisor;
