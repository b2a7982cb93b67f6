// ── Immutable topology state view ──
//
// The snapshot is the only shape task predicates and the presentation
// adapter ever see. It is rebuilt by the store after every effective
// mutation and shared as `Arc<TopologySnapshot>`, so readers can never
// mutate the store through it.

use serde::{Deserialize, Serialize};

use crate::model::{Connection, Device, DeviceId, DeviceKind, FirewallRule, RuleAction, Vlan};

/// A read-only view of the full topology at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub devices: Vec<Device>,
    pub connections: Vec<Connection>,
    pub vlans: Vec<Vlan>,
    pub firewall_rules: Vec<FirewallRule>,
}

impl TopologySnapshot {
    /// Device by id.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// All devices of a kind.
    pub fn devices_of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |d| d.kind == kind)
    }

    /// Whether at least one device of `kind` has been placed.
    pub fn has_device_of_kind(&self, kind: DeviceKind) -> bool {
        self.devices.iter().any(|d| d.kind == kind)
    }

    /// Whether a link exists between the two devices, in either order.
    pub fn are_connected(&self, a: DeviceId, b: DeviceId) -> bool {
        self.connections.iter().any(|c| c.links(a, b))
    }

    /// Whether any link joins a device of `a` to a device of `b`.
    pub fn kinds_connected(&self, a: DeviceKind, b: DeviceKind) -> bool {
        self.connections.iter().any(|c| {
            let (Some(from), Some(to)) = (self.device(c.from), self.device(c.to)) else {
                return false;
            };
            (from.kind == a && to.kind == b) || (from.kind == b && to.kind == a)
        })
    }

    /// Whether any switch port has been moved off the default VLAN.
    pub fn any_port_reassigned(&self) -> bool {
        self.devices
            .iter()
            .flat_map(|d| d.ports.iter())
            .any(|p| !p.vlan.is_default())
    }

    /// Whether any firewall rule with the given action exists.
    pub fn has_rule_with_action(&self, action: RuleAction) -> bool {
        self.firewall_rules.iter().any(|r| r.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabConfig;
    use crate::model::Position;
    use crate::store::TopologyStore;

    fn snapshot_with(kinds: &[DeviceKind]) -> TopologySnapshot {
        let mut store = TopologyStore::new(&LabConfig::default());
        for kind in kinds {
            store.add_device(*kind, Position::default());
        }
        (*store.snapshot()).clone()
    }

    #[test]
    fn kind_queries() {
        let snap = snapshot_with(&[DeviceKind::Router, DeviceKind::Switch]);
        assert!(snap.has_device_of_kind(DeviceKind::Router));
        assert!(!snap.has_device_of_kind(DeviceKind::Nvr));
        assert_eq!(snap.devices_of_kind(DeviceKind::Switch).count(), 1);
    }

    #[test]
    fn kinds_connected_matches_either_order() {
        let mut store = TopologyStore::new(&LabConfig::default());
        let router = store.add_device(DeviceKind::Router, Position::default());
        let switch = store.add_device(DeviceKind::Switch, Position::default());
        store.connect(switch, router).expect("switch has free ports");

        let snap = store.snapshot();
        assert!(snap.kinds_connected(DeviceKind::Router, DeviceKind::Switch));
        assert!(snap.kinds_connected(DeviceKind::Switch, DeviceKind::Router));
        assert!(!snap.kinds_connected(DeviceKind::Router, DeviceKind::Nvr));
    }
}
