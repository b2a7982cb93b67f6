// ── Guided-task curriculum ──
//
// An ordered list of predicate-gated instructional steps. The engine
// re-evaluates the active predicate against the latest snapshot after
// every state change and only ever moves forward.

mod engine;
mod lessons;
mod task;

pub use engine::{TaskAdvance, TaskEngine};
pub use lessons::default_curriculum;
pub use task::{Task, TaskView};
