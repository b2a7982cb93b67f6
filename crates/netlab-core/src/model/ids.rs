// ── Core identity types ──
//
// DeviceId and VlanId are the foundation of every domain type. Both are
// session-local: ids are allocated by the store, never reused, and have
// no meaning outside the session that created them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── DeviceId ────────────────────────────────────────────────────────

/// Canonical identifier for a device on the canvas.
///
/// Allocated monotonically by the store starting at 1. Unique across
/// the lifetime of the session -- removal does not exist, so ids are
/// never recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── VlanId ──────────────────────────────────────────────────────────

/// Numeric VLAN identifier.
///
/// User-created VLANs are allocated in steps of 10 starting at 10; the
/// implicit default segment every switch port starts on is [`DEFAULT_VLAN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VlanId(u16);

/// The implicit default VLAN every switch port is born on.
pub const DEFAULT_VLAN: VlanId = VlanId(1);

impl VlanId {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Whether this is the implicit default segment.
    pub fn is_default(self) -> bool {
        self == DEFAULT_VLAN
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
