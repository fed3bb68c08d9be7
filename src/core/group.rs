//! # Task group: a fixed pool of slots running the same task.
//!
//! A [`TaskGroup`] is created once, at registration, with as many
//! [`InstanceSlot`]s as the clamped instance count. The slot array never
//! changes size, so reading the group's shape needs no lock; each slot
//! guards its own contents.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::actor::SlotActor;
use crate::core::slot::InstanceSlot;
use crate::events::Bus;
use crate::policies::{BackoffPolicy, RestartPolicy};
use crate::report::GroupReport;
use crate::tasks::{GroupSpec, TaskRef};

/// A registered group of identical instances.
pub struct TaskGroup {
    name: Arc<str>,
    task: TaskRef,
    restart: RestartPolicy,
    backoff: BackoffPolicy,
    slots: Box<[InstanceSlot]>,
}

impl TaskGroup {
    pub(crate) fn new(spec: &GroupSpec) -> Arc<Self> {
        let name: Arc<str> = Arc::from(spec.name());
        let slots = (0..spec.instances())
            .map(|i| InstanceSlot::new(Arc::clone(&name), i))
            .collect();
        Arc::new(Self {
            name,
            task: Arc::clone(spec.task()),
            restart: spec.restart(),
            backoff: spec.backoff(),
            slots,
        })
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Number of instances (already clamped).
    pub fn instances(&self) -> usize {
        self.slots.len()
    }

    /// Restart policy shared by every slot.
    pub fn restart(&self) -> RestartPolicy {
        self.restart
    }

    /// Restart delay shared by every slot.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    pub(crate) fn task(&self) -> &TaskRef {
        &self.task
    }

    /// All slots, in index order.
    pub fn slots(&self) -> &[InstanceSlot] {
        &self.slots
    }

    /// Slot by index.
    pub fn slot(&self, index: usize) -> Option<&InstanceSlot> {
        self.slots.get(index)
    }

    /// Reads every slot (each under its own lock) and sums the counters.
    pub fn report(&self) -> GroupReport {
        let slots = self.slots.iter().map(InstanceSlot::report).collect();
        GroupReport::from_slots(Arc::clone(&self.name), slots)
    }

    /// Launches every slot. Only spawns; never waits for a task.
    pub(crate) fn launch_all(self: &Arc<Self>, rt: &Handle, bus: &Bus) -> Vec<JoinHandle<()>> {
        (0..self.slots.len())
            .map(|index| self.launch_one(index, rt, bus))
            .collect()
    }

    /// Marks the slot running and spawns its actor.
    pub(crate) fn launch_one(self: &Arc<Self>, index: usize, rt: &Handle, bus: &Bus) -> JoinHandle<()> {
        let actor = SlotActor::new(Arc::clone(self), index, bus.clone());
        actor.begin_attempt(1);
        rt.spawn(actor.run())
    }
}

impl std::fmt::Debug for TaskGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGroup")
            .field("name", &self.name)
            .field("instances", &self.slots.len())
            .field("restart", &self.restart)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
