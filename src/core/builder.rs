use std::sync::Arc;

use crate::{
    config::SupervisorConfig,
    core::runner::install_backtrace_hook,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

use super::supervisor::Supervisor;

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the supervisor.
    ///
    /// # Panics
    /// Panics if subscribers were added and this is called outside a tokio
    /// runtime (their workers have to be spawned). A supervisor without
    /// subscribers can be built anywhere.
    pub fn build(self) -> Arc<Supervisor> {
        if self.cfg.capture_backtraces {
            install_backtrace_hook();
        }

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let sup = Arc::new(Supervisor::new_internal(self.cfg, bus, subs));
        sup.subscriber_listener();
        sup
    }
}
