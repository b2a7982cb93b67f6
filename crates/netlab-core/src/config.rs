// ── Runtime lab configuration ──
//
// These types describe the tuning knobs of a lab session. They never
// touch disk -- the `netlab-config` crate layers TOML and environment
// sources on top and hands the result in.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning for one lab session.
///
/// Built by the embedding frontend (or loaded through `netlab-config`)
/// and passed to [`LabSession::new`](crate::session::LabSession::new);
/// the core never reads config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Ports on every newly created switch.
    pub switch_port_count: u8,

    /// Simulated reboot duration in milliseconds.
    pub reboot_delay_ms: u64,

    /// Icon-centering offset subtracted from the pointer position when a
    /// toolbar icon is dropped onto the canvas, in canvas units.
    pub icon_offset: f64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            switch_port_count: 8,
            reboot_delay_ms: 2_000,
            icon_offset: 40.0,
        }
    }
}

impl LabConfig {
    pub fn reboot_delay(&self) -> Duration {
        Duration::from_millis(self.reboot_delay_ms)
    }
}
