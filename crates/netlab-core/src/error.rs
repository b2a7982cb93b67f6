// ── Core error types ──
//
// Everything here is a user-facing rejection: the message is the hint
// the presentation adapter shows the learner. Invalid references
// (unknown ids) are NOT errors -- the store treats them as silent
// no-ops, since every id is sourced from the store itself.

use thiserror::Error;

/// Rejections raised by the topology store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("VLAN name cannot be empty")]
    EmptyVlanName,

    #[error("Switch '{switch}' has no free ports")]
    NoFreePorts { switch: String },
}

/// Rejections raised at the session boundary, before any store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("'{value}' is not a valid IPv4 address")]
    InvalidIp { value: String },

    #[error("'{value}' is not a valid subnet (expected a dotted mask or CIDR notation)")]
    InvalidSubnet { value: String },

    #[error("IP address {ip} is already in use by '{device}'")]
    DuplicateIp { ip: String, device: String },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}
