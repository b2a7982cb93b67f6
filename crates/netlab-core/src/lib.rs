//! Core of the guided network-topology lab.
//!
//! This crate owns the state model and the interaction/task machinery the
//! presentation layer drives:
//!
//! - **[`TopologyStore`]** -- Canonical graph of devices, connections, VLANs,
//!   and firewall rules. Mutations rebuild an immutable
//!   [`TopologySnapshot`] broadcast over a `watch` channel -- the single
//!   "state changed" notification consumers re-render from.
//!
//! - **[`InteractionController`]** -- Pointer state machine (idle / dragging /
//!   connecting) translating canvas input into store mutations. The store is
//!   injected on every call; the controller owns only transient mode and
//!   selection.
//!
//! - **[`TaskEngine`]** -- Ordered curriculum of predicate-gated steps,
//!   re-evaluated against the latest snapshot after every state change.
//!   Forward-only, with an absorbing terminal sandbox task.
//!
//! - **[`LabSession`]** -- Facade wiring the three together behind one handle,
//!   plus boundary validation (addresses, duplicate IPs) and the cancellable
//!   simulated-reboot scheduler.
//!
//! Rendering, dialogs, toasts, and durable progress storage are external
//! collaborators: they subscribe to snapshots and [`LabEvent`]s and call back
//! into the session.

pub mod config;
pub mod curriculum;
pub mod error;
pub mod interact;
pub mod model;
pub mod progress;
pub mod session;
pub mod snapshot;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::LabConfig;
pub use curriculum::{default_curriculum, Task, TaskAdvance, TaskEngine, TaskView};
pub use error::{SessionError, TopologyError};
pub use interact::{drop_device, ClickOutcome, InteractionController, InteractionMode};
pub use progress::{MemoryProgress, ProgressStore};
pub use session::{LabEvent, LabSession};
pub use snapshot::TopologySnapshot;
pub use store::TopologyStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Connection, Device, DeviceId, DeviceKind, DeviceStatus, EditableField, FirewallRule, Port,
    Position, RuleAction, Vlan, VlanId, DEFAULT_VLAN,
};
