//! # Group registry.
//!
//! Maps trimmed group names to their [`TaskGroup`] and remembers
//! registration order for deterministic reports.
//!
//! ## Rules
//! - Names are unique for the registry's lifetime; registration is append-only.
//! - Insert and launch happen under one lock, so a group is never visible
//!   before all of its slots are marked running.
//! - Readers copy the `Arc`s out and release the lock before touching any slot.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::group::TaskGroup;
use crate::error::RegisterError;
use crate::tasks::GroupSpec;

#[derive(Default)]
struct Inner {
    by_name: HashMap<Arc<str>, Arc<TaskGroup>>,
    order: Vec<Arc<TaskGroup>>,
}

#[derive(Default)]
pub(crate) struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates the group for `spec`, stores it and calls `launch` while the lock is held.
    ///
    /// `launch` must only spawn; it runs under the registry lock.
    pub(crate) fn insert_and_launch(
        &self,
        spec: &GroupSpec,
        launch: impl FnOnce(&Arc<TaskGroup>),
    ) -> Result<Arc<TaskGroup>, RegisterError> {
        let mut inner = self.inner.lock();
        if inner.by_name.contains_key(spec.name()) {
            return Err(RegisterError::DuplicateName {
                name: spec.name().to_owned(),
            });
        }

        let group = TaskGroup::new(spec);
        inner
            .by_name
            .insert(Arc::clone(group.shared_name()), Arc::clone(&group));
        inner.order.push(Arc::clone(&group));
        launch(&group);
        Ok(group)
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<TaskGroup>> {
        self.inner.lock().by_name.get(name).cloned()
    }

    /// Groups in registration order.
    pub(crate) fn groups(&self) -> Vec<Arc<TaskGroup>> {
        self.inner.lock().order.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackoffPolicy, RestartPolicy, TaskError, TaskFn};

    fn spec(name: &str, n: i64) -> GroupSpec {
        let task = TaskFn::arc(|| async { Ok::<(), TaskError>(()) });
        GroupSpec::new(name, n, task, RestartPolicy::Never, BackoffPolicy::default())
    }

    #[test]
    fn duplicate_is_rejected_without_launching() {
        let reg = Registry::new();
        let mut launched = 0;
        reg.insert_and_launch(&spec("a", 2), |_| launched += 1)
            .expect("first insert");
        let err = reg
            .insert_and_launch(&spec("  a ", 50), |_| launched += 1)
            .expect_err("duplicate");

        assert!(matches!(err, RegisterError::DuplicateName { ref name } if name == "a"));
        assert_eq!(launched, 1);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("a").map(|g| g.instances()), Some(2));
    }

    #[test]
    fn names_are_case_sensitive_and_ordered() {
        let reg = Registry::new();
        for name in ["zeta", "Alpha", "alpha"] {
            reg.insert_and_launch(&spec(name, 1), |_| {}).expect("insert");
        }
        let names: Vec<_> = reg.groups().iter().map(|g| g.name().to_owned()).collect();
        assert_eq!(names, ["zeta", "Alpha", "alpha"]);
    }
}
