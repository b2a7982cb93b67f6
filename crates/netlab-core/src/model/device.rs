// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::common::Position;
use super::ids::{DeviceId, VlanId, DEFAULT_VLAN};

/// Canonical device kind -- the closed set of equipment the toolbar offers.
///
/// Immutable after creation. Kebab-case labels double as toolbar
/// identifiers and default-name prefixes (`ip-camera-3`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceKind {
    Router,
    Switch,
    IpCamera,
    Nvr,
    Workstation,
    Server,
}

impl DeviceKind {
    /// Whether this kind carries a port table.
    pub fn has_ports(self) -> bool {
        matches!(self, Self::Switch)
    }

    /// The fields the config panel may edit for this kind.
    ///
    /// Switches expose only their label; everything else is an IP endpoint
    /// (routers hold the addressing for the segment they route). This table
    /// replaces the original per-kind branch logic in the config panels.
    pub fn editable_fields(self) -> &'static [EditableField] {
        match self {
            Self::Switch => &[EditableField::Name],
            Self::Router | Self::IpCamera | Self::Nvr | Self::Workstation | Self::Server => &[
                EditableField::Name,
                EditableField::Ip,
                EditableField::Subnet,
                EditableField::Gateway,
            ],
        }
    }
}

/// Mutable device fields addressable from the config panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EditableField {
    Name,
    Ip,
    Subnet,
    Gateway,
}

/// Device operational status, flipped by the simulated reboot action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[default]
    Online,
    Rebooting,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Port on a switch. Fixed at creation, addressed 1..=N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub index: u8,
    /// VLAN assignment; every port is born on the default segment.
    pub vlan: VlanId,
    /// The device wired to this port, if any.
    pub connected_to: Option<DeviceId>,
}

impl Port {
    fn new(index: u8) -> Self {
        Self {
            index,
            vlan: DEFAULT_VLAN,
            connected_to: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.connected_to.is_none()
    }
}

/// The canonical device type -- a node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    /// User-editable display label, defaults to `"{kind}-{id}"`.
    pub name: String,
    pub position: Position,
    pub status: DeviceStatus,

    // Endpoint / router addressing
    pub ip: Option<String>,
    pub subnet: Option<String>,
    pub gateway: Option<String>,

    /// Port table -- switches only, empty for every other kind.
    pub ports: Vec<Port>,
}

impl Device {
    /// Build a default-attribute device. Switches get `port_count` ports,
    /// each on the default VLAN and unconnected.
    pub(crate) fn new(id: DeviceId, kind: DeviceKind, position: Position, port_count: u8) -> Self {
        let ports = if kind.has_ports() {
            (1..=port_count).map(Port::new).collect()
        } else {
            Vec::new()
        };

        Self {
            id,
            kind,
            name: format!("{kind}-{id}"),
            position,
            status: DeviceStatus::default(),
            ip: None,
            subnet: None,
            gateway: None,
            ports,
        }
    }

    /// Lowest-indexed port with no connection, if any.
    pub fn first_free_port(&self) -> Option<&Port> {
        self.ports.iter().find(|p| p.is_free())
    }

    pub(crate) fn first_free_port_mut(&mut self) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.is_free())
    }

    /// Port by its 1-based index.
    pub fn port(&self, index: u8) -> Option<&Port> {
        self.ports.iter().find(|p| p.index == index)
    }

    pub(crate) fn port_mut(&mut self, index: u8) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.index == index)
    }
}
