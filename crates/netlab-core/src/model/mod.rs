// ── Topology domain model ──
//
// Every type in this module is the canonical representation of a lab
// entity. The store owns all instances; the interaction controller and
// the task engine only ever hold ids.

pub mod common;
pub mod ids;

pub mod connection;
pub mod device;
pub mod firewall;
pub mod vlan;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use netlab_core::model::*` gives you everything.

// Identity
pub use ids::{DeviceId, VlanId, DEFAULT_VLAN};

// Geometry
pub use common::Position;

// Device
pub use device::{Device, DeviceKind, DeviceStatus, EditableField, Port};

// Connection
pub use connection::Connection;

// VLAN
pub use vlan::Vlan;

// Firewall
pub use firewall::{FirewallRule, RuleAction};
