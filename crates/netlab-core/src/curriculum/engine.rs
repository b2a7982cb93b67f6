// ── Forward-only curriculum progression ──

use serde::Serialize;
use tracing::{debug, info};

use super::task::{Task, TaskView};
use crate::snapshot::TopologySnapshot;

/// Emitted when the active predicate is satisfied and the index moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAdvance {
    pub completed_key: &'static str,
    pub success_message: Option<String>,
    /// The task that just became active.
    pub active: TaskView,
}

/// Holds curriculum progress as a single forward-only index.
///
/// The last task is a permanent terminal "explore" phase: its predicate
/// is authored to return false, and the engine additionally never
/// advances past it. An index out of range of the list (unreachable
/// under single-step increments) is treated as terminal rather than a
/// panic.
#[derive(Debug)]
pub struct TaskEngine {
    tasks: Vec<Task>,
    current: usize,
}

impl TaskEngine {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, current: 0 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The active task, or `None` past the end of the list.
    pub fn active_task(&self) -> Option<&Task> {
        self.tasks.get(self.current)
    }

    /// Presentation view of the active task.
    pub fn active_view(&self) -> Option<TaskView> {
        self.active_task().map(|t| t.view(self.current))
    }

    /// Whether progression has reached the absorbing final task.
    pub fn is_terminal(&self) -> bool {
        self.current + 1 >= self.tasks.len()
    }

    /// Evaluate the active predicate against `snapshot`; advance one step
    /// when it is satisfied.
    ///
    /// At most one step per call: a mutation that happens to satisfy two
    /// consecutive predicates advances the second on the next discrete
    /// action's check, matching per-action evaluation.
    pub fn check_completion(&mut self, snapshot: &TopologySnapshot) -> Option<TaskAdvance> {
        if self.is_terminal() {
            return None;
        }
        let task = self.tasks.get(self.current)?;
        if !task.is_complete(snapshot) {
            debug!(index = self.current, key = task.key(), "active task not yet complete");
            return None;
        }

        let completed_key = task.key();
        let success_message = task.success_message().map(str::to_owned);
        self.current += 1;

        // `is_terminal` above guarantees a successor exists.
        let active = self.tasks.get(self.current)?.view(self.current);
        info!(completed = completed_key, next = active.key, "task advanced");

        Some(TaskAdvance {
            completed_key,
            success_message,
            active,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::LabConfig;
    use crate::model::{DeviceKind, Position};
    use crate::store::TopologyStore;

    fn engine() -> TaskEngine {
        TaskEngine::new(vec![
            Task::new("one-device", "Place a device.", |s| !s.devices.is_empty()),
            Task::new("two-devices", "Place another.", |s| s.devices.len() >= 2),
            Task::new("sandbox", "Explore freely.", |_| false),
        ])
    }

    #[test]
    fn advances_one_step_per_check() {
        let mut store = TopologyStore::new(&LabConfig::default());
        let mut engine = engine();

        store.add_device(DeviceKind::Router, Position::default());
        store.add_device(DeviceKind::Switch, Position::default());
        let snap = store.snapshot();

        // Both predicates hold, but each check moves a single step.
        let adv = engine.check_completion(&snap).unwrap();
        assert_eq!(adv.completed_key, "one-device");
        assert_eq!(adv.active.index, 1);

        let adv = engine.check_completion(&snap).unwrap();
        assert_eq!(adv.completed_key, "two-devices");
        assert_eq!(adv.active.key, "sandbox");
    }

    #[test]
    fn index_never_decreases() {
        let mut store = TopologyStore::new(&LabConfig::default());
        let mut engine = engine();

        store.add_device(DeviceKind::Router, Position::default());
        engine.check_completion(&store.snapshot());
        assert_eq!(engine.current_index(), 1);

        // An emptier-looking snapshot cannot move the index back.
        engine.check_completion(&TopologySnapshot::default());
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn terminal_task_is_absorbing() {
        let mut store = TopologyStore::new(&LabConfig::default());
        let mut engine = engine();
        store.add_device(DeviceKind::Router, Position::default());
        store.add_device(DeviceKind::Switch, Position::default());

        let snap = store.snapshot();
        engine.check_completion(&snap);
        engine.check_completion(&snap);
        assert!(engine.is_terminal());

        for _ in 0..5 {
            assert!(engine.check_completion(&snap).is_none());
        }
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn empty_curriculum_is_terminal_and_silent() {
        let mut engine = TaskEngine::new(Vec::new());
        assert!(engine.is_terminal());
        assert!(engine.active_task().is_none());
        assert!(engine.check_completion(&TopologySnapshot::default()).is_none());
    }
}
