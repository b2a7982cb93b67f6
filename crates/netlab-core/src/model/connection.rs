// ── Physical link between two devices ──

use serde::{Deserialize, Serialize};

use super::ids::DeviceId;

/// An undirected link between two devices.
///
/// Stored as the (from, to) pair the user drew, but equality of the link
/// itself is unordered -- use [`links`](Connection::links) rather than
/// comparing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: DeviceId,
    pub to: DeviceId,
}

impl Connection {
    pub fn new(from: DeviceId, to: DeviceId) -> Self {
        Self { from, to }
    }

    /// Whether this link joins `a` and `b`, in either order.
    pub fn links(&self, a: DeviceId, b: DeviceId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Whether this link has `id` as one of its endpoints.
    pub fn touches(&self, id: DeviceId) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn peer_of(&self, id: DeviceId) -> Option<DeviceId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }
}
