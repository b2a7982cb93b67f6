// ── Central topology store ──
//
// Owns the canonical graph: devices, connections, VLANs, firewall rules.
// Guarantees referential consistency between devices, ports, and
// connections. Every effective mutation rebuilds the snapshot broadcast
// to subscribers via a `watch` channel and bumps a version counter;
// rejected or no-op calls notify nothing.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::debug;

use crate::config::LabConfig;
use crate::error::TopologyError;
use crate::model::{
    Connection, Device, DeviceId, DeviceKind, DeviceStatus, EditableField, FirewallRule, Position,
    Vlan, VlanId,
};
use crate::snapshot::TopologySnapshot;

/// VLAN ids are handed out in steps of 10, starting at 10.
const VLAN_ID_STEP: u16 = 10;

/// The canonical topology graph for one lab session.
///
/// All entities live here for the remainder of the session -- the lab
/// defines no delete operation for devices, connections, or VLANs
/// (firewall rules alone support delete-by-index), so ids are never
/// recycled and links can never dangle.
pub struct TopologyStore {
    devices: IndexMap<DeviceId, Device>,
    connections: Vec<Connection>,
    vlans: Vec<Vlan>,
    firewall_rules: Vec<FirewallRule>,

    next_device_id: u64,
    switch_port_count: u8,

    /// Full snapshot, rebuilt on mutation for predicate evaluation and
    /// presentation redraws.
    snapshot: watch::Sender<Arc<TopologySnapshot>>,

    /// Version counter, bumped on every effective mutation.
    version: watch::Sender<u64>,
}

impl TopologyStore {
    pub fn new(config: &LabConfig) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(TopologySnapshot::default()));
        let (version, _) = watch::channel(0u64);

        Self {
            devices: IndexMap::new(),
            connections: Vec::new(),
            vlans: Vec::new(),
            firewall_rules: Vec::new(),
            next_device_id: 1,
            switch_port_count: config.switch_port_count,
            snapshot,
            version,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Allocate the next id and append a default-attribute device.
    ///
    /// Switches get the configured fixed-size port table, each port on
    /// the default VLAN and unconnected. Infallible: `kind` is a closed
    /// set and positions are unconstrained.
    pub fn add_device(&mut self, kind: DeviceKind, position: Position) -> DeviceId {
        let id = DeviceId::new(self.next_device_id);
        self.next_device_id += 1;

        let device = Device::new(id, kind, position, self.switch_port_count);
        debug!(%id, %kind, "device added");
        self.devices.insert(id, device);

        self.publish();
        id
    }

    /// Overwrite a device's position.
    ///
    /// High-frequency during drags: updates position only, never
    /// allocates entities. Unknown id is a silent no-op.
    pub fn move_device(&mut self, id: DeviceId, position: Position) {
        let Some(device) = self.devices.get_mut(&id) else {
            debug!(%id, "move ignored: unknown device");
            return;
        };
        device.position = position;
        self.publish();
    }

    /// Overwrite one of the mutable device fields.
    ///
    /// The per-kind editable-field table gates the write: a field outside
    /// the device's mapping is ignored, as is an unknown id. Values are
    /// stored verbatim -- syntax validation happens at the session
    /// boundary before this call.
    pub fn update_device_field(&mut self, id: DeviceId, field: EditableField, value: &str) {
        let Some(device) = self.devices.get_mut(&id) else {
            debug!(%id, "field update ignored: unknown device");
            return;
        };
        if !device.kind.editable_fields().contains(&field) {
            debug!(%id, kind = %device.kind, %field, "field update ignored: not editable for kind");
            return;
        }

        match field {
            EditableField::Name => device.name = value.to_owned(),
            EditableField::Ip => device.ip = Some(value.to_owned()),
            EditableField::Subnet => device.subnet = Some(value.to_owned()),
            EditableField::Gateway => device.gateway = Some(value.to_owned()),
        }

        self.publish();
    }

    /// Wire two devices together.
    ///
    /// Silent no-op (`Ok`, nothing recorded, nothing notified) when
    /// `a == b` or either id is unknown -- ids are sourced from this store,
    /// so those cases are unreachable in correct usage. When an endpoint
    /// is a switch, the lowest-indexed free port on it is bound to the
    /// other endpoint; a switch with no free port rejects the whole
    /// connection and nothing mutates.
    pub fn connect(&mut self, a: DeviceId, b: DeviceId) -> Result<(), TopologyError> {
        if a == b {
            debug!(%a, "connect ignored: self-loop");
            return Ok(());
        }
        if !self.devices.contains_key(&a) || !self.devices.contains_key(&b) {
            debug!(%a, %b, "connect ignored: unknown endpoint");
            return Ok(());
        }

        // Reject before binding anything, so a full switch leaves no
        // half-applied port state behind.
        for (switch, _) in [(a, b), (b, a)] {
            if let Some(device) = self.devices.get(&switch) {
                if device.kind.has_ports() && device.first_free_port().is_none() {
                    return Err(TopologyError::NoFreePorts {
                        switch: device.name.clone(),
                    });
                }
            }
        }

        for (switch, peer) in [(a, b), (b, a)] {
            if let Some(device) = self.devices.get_mut(&switch) {
                if device.kind.has_ports() {
                    if let Some(port) = device.first_free_port_mut() {
                        port.connected_to = Some(peer);
                    }
                }
            }
        }

        self.connections.push(Connection::new(a, b));
        debug!(%a, %b, "devices connected");

        self.publish();
        Ok(())
    }

    /// Create a VLAN, allocating the next id as `max existing + 10`.
    ///
    /// A name that is empty after trimming is rejected and nothing is
    /// notified.
    pub fn add_vlan(&mut self, name: &str) -> Result<VlanId, TopologyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TopologyError::EmptyVlanName);
        }

        let next = self
            .vlans
            .iter()
            .map(|v| v.id.get())
            .max()
            .unwrap_or(0)
            + VLAN_ID_STEP;
        let id = VlanId::new(next);
        self.vlans.push(Vlan::new(id, name));
        debug!(%id, name, "vlan created");

        self.publish();
        Ok(id)
    }

    /// Overwrite a port's VLAN assignment.
    ///
    /// No validation that the VLAN exists -- the lab lets learners point
    /// ports at segments they have not created yet. Unknown switch, a
    /// non-switch target, or an unknown port index is a silent no-op.
    pub fn set_port_vlan(&mut self, switch: DeviceId, port_index: u8, vlan: VlanId) {
        let Some(device) = self.devices.get_mut(&switch) else {
            debug!(%switch, "port vlan ignored: unknown device");
            return;
        };
        let Some(port) = device.port_mut(port_index) else {
            debug!(%switch, port_index, "port vlan ignored: no such port");
            return;
        };
        port.vlan = vlan;
        self.publish();
    }

    /// Append a firewall rule.
    pub fn add_firewall_rule(&mut self, rule: FirewallRule) {
        self.firewall_rules.push(rule);
        self.publish();
    }

    /// Remove a firewall rule by display position. Out of range is a
    /// silent no-op.
    pub fn remove_firewall_rule(&mut self, index: usize) {
        if index >= self.firewall_rules.len() {
            debug!(index, "rule removal ignored: out of range");
            return;
        }
        self.firewall_rules.remove(index);
        self.publish();
    }

    /// Flip a device's operational status. Used by the reboot scheduler;
    /// unknown id or an unchanged status is a silent no-op.
    pub fn set_device_status(&mut self, id: DeviceId, status: DeviceStatus) {
        let Some(device) = self.devices.get_mut(&id) else {
            debug!(%id, "status change ignored: unknown device");
            return;
        };
        if device.status == status {
            return;
        }
        device.status = status;
        self.publish();
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn vlans(&self) -> &[Vlan] {
        &self.vlans
    }

    pub fn firewall_rules(&self) -> &[FirewallRule] {
        &self.firewall_rules
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<TopologySnapshot> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes. This is the single "state changed"
    /// notification the presentation adapter consumes -- no structured
    /// diff, the adapter decides what to redraw.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TopologySnapshot>> {
        self.snapshot.subscribe()
    }

    /// Mutation counter. Rejected mutations do not bump it.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Rebuild the snapshot and broadcast it to subscribers.
    fn publish(&mut self) {
        debug_assert!(
            self.connections
                .iter()
                .all(|c| self.devices.contains_key(&c.from) && self.devices.contains_key(&c.to)),
            "connection endpoints must reference live devices",
        );

        let snap = TopologySnapshot {
            devices: self.devices.values().cloned().collect(),
            connections: self.connections.clone(),
            vlans: self.vlans.clone(),
            firewall_rules: self.firewall_rules.clone(),
        };
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|s| *s = Arc::new(snap));
        self.version.send_modify(|v| *v += 1);
    }
}
