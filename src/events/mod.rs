//! Runtime events: types and broadcast bus.
//!
//! Every observable change in the supervisor (group registered or rejected,
//! instance starting / exited / panicked, restart scheduled, monitor started)
//! is published as an [`Event`] on the [`Bus`].
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` (registration, monitor), `SlotActor` (instance lifecycle),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Supervisor::subscriber_listener()` fanning out to user subscribers.
//!
//! Status reports do not depend on events: slots hold their own state, so a
//! lagging or absent subscriber never makes `snapshot()` stale.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, RestartSource};
