// ── Curriculum progress persistence seam ──

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Flat mapping from task key to a completion flag.
///
/// The session writes a key on each task completion; the (external)
/// curriculum-progress feature reads it back at load. Durable backends
/// implement this trait outside the core.
pub trait ProgressStore {
    /// Completion flag for `key`, or `None` if never recorded.
    fn get(&self, key: &str) -> Option<bool>;

    /// Record the completion flag for `key`.
    fn set(&mut self, key: &str, complete: bool);
}

/// In-memory progress map, the default for a fresh session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryProgress {
    entries: HashMap<String, bool>,
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgress {
    fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &str, complete: bool) {
        self.entries.insert(key.to_owned(), complete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_reads_back() {
        let mut progress = MemoryProgress::new();
        assert_eq!(progress.get("place-router"), None);

        progress.set("place-router", true);
        assert_eq!(progress.get("place-router"), Some(true));
    }
}
