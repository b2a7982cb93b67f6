// ── VLAN domain type ──

use serde::{Deserialize, Serialize};

use super::ids::VlanId;

/// A named logical network segment switch ports can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: VlanId,
    /// User-supplied label. Uniqueness is not enforced.
    pub name: String,
    /// Gateway address, derived by convention as `192.168.{id}.1`.
    pub gateway: String,
}

impl Vlan {
    pub(crate) fn new(id: VlanId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gateway: format!("192.168.{id}.1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_follows_convention() {
        let vlan = Vlan::new(VlanId::new(20), "cameras");
        assert_eq!(vlan.gateway, "192.168.20.1");
    }
}
