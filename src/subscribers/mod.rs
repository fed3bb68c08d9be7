//! # Event subscribers.
//!
//! [`Subscribe`] is the extension point for reacting to runtime events
//! (logging, metrics, alerting). [`SubscriberSet`] fans events out to all
//! subscribers, each with its own bounded queue and worker task.
//!
//! ```text
//! Bus ──► subscriber_listener ──► SubscriberSet::emit(&Event)
//!                                   ├──► [queue] ──► worker ──► sub1.on_event()
//!                                   └──► [queue] ──► worker ──► subN.on_event()
//! ```

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
