// ── Task descriptor ──

use std::fmt;

use serde::Serialize;

use crate::snapshot::TopologySnapshot;

type Predicate = Box<dyn Fn(&TopologySnapshot) -> bool + Send + Sync>;

/// One step of the curriculum.
///
/// The completion predicate is a pure function of the snapshot -- it can
/// inspect the whole topology but has no way to reach the store. The
/// `key` is stable across runs and doubles as the progress-store key.
pub struct Task {
    key: &'static str,
    description: String,
    highlight: Option<String>,
    success_message: Option<String>,
    predicate: Predicate,
}

impl Task {
    pub fn new(
        key: &'static str,
        description: impl Into<String>,
        predicate: impl Fn(&TopologySnapshot) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            description: description.into(),
            highlight: None,
            success_message: None,
            predicate: Box::new(predicate),
        }
    }

    /// Presentation hint: the UI element to call attention to while this
    /// task is active.
    pub fn with_highlight(mut self, selector: impl Into<String>) -> Self {
        self.highlight = Some(selector.into());
        self
    }

    /// Toast shown when this task completes.
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub(crate) fn is_complete(&self, snapshot: &TopologySnapshot) -> bool {
        (self.predicate)(snapshot)
    }

    pub(crate) fn view(&self, index: usize) -> TaskView {
        TaskView {
            index,
            key: self.key,
            description: self.description.clone(),
            highlight: self.highlight.clone(),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("key", &self.key)
            .field("description", &self.description)
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

/// The predicate-free face of a task, handed to the presentation
/// adapter whenever the active task changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub index: usize,
    pub key: &'static str,
    pub description: String,
    pub highlight: Option<String>,
}
