// ── Built-in guided lesson ──
//
// The surveillance-network curriculum the lab ships with. Predicates
// check structure only (kinds, links, segments, rules) -- names,
// positions, and addressing are the learner's to choose.

use super::task::Task;
use crate::model::{DeviceKind, RuleAction};

/// The default ordered curriculum, ending in the permanent sandbox task.
pub fn default_curriculum() -> Vec<Task> {
    vec![
        Task::new("place-router", "Drag a router onto the canvas.", |s| {
            s.has_device_of_kind(DeviceKind::Router)
        })
        .with_highlight("toolbar-router")
        .with_success_message("Router placed. Every network needs a core."),
        Task::new(
            "place-switch",
            "Add a switch so your devices have somewhere to plug in.",
            |s| {
                s.has_device_of_kind(DeviceKind::Router) && s.has_device_of_kind(DeviceKind::Switch)
            },
        )
        .with_highlight("toolbar-switch")
        .with_success_message("Switch placed."),
        Task::new(
            "uplink-switch",
            "Connect the switch to the router to give it an uplink.",
            |s| s.kinds_connected(DeviceKind::Router, DeviceKind::Switch),
        )
        .with_highlight("connect-button")
        .with_success_message("Uplink established."),
        Task::new(
            "place-surveillance",
            "Add an IP camera and an NVR to record it.",
            |s| s.has_device_of_kind(DeviceKind::IpCamera) && s.has_device_of_kind(DeviceKind::Nvr),
        )
        .with_highlight("toolbar-ip-camera")
        .with_success_message("Surveillance gear placed."),
        Task::new(
            "create-camera-vlan",
            "Create a VLAN to keep camera traffic off the main network.",
            |s| !s.vlans.is_empty(),
        )
        .with_highlight("vlan-panel")
        .with_success_message("VLAN created."),
        Task::new(
            "assign-port-vlan",
            "Assign one of the switch ports to your new VLAN.",
            |s| s.any_port_reassigned(),
        )
        .with_highlight("port-panel")
        .with_success_message("Port segmented."),
        Task::new(
            "deny-camera-traffic",
            "Add a firewall rule that denies traffic out of the camera segment.",
            |s| s.has_rule_with_action(RuleAction::Deny),
        )
        .with_highlight("firewall-panel")
        .with_success_message("Cameras contained. The lab is yours."),
        // Terminal sandbox phase: never completes.
        Task::new(
            "sandbox",
            "Free build: keep growing the network however you like.",
            |_| false,
        ),
    ]
}
