// ── Pointer interaction state machine ──
//
// Translates raw pointer input from the presentation adapter into store
// mutations. The store is handed in explicitly on every call -- the
// controller owns only the transient mode and the selection, never the
// graph.

use tracing::debug;

use crate::error::TopologyError;
use crate::model::{DeviceId, DeviceKind, Position};
use crate::store::TopologyStore;

/// Transient pointer mode.
///
/// `Dragging` carries everything needed to compute positions from
/// pointer deltas alone, so pointer-move never has to re-query where the
/// drag started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging {
        device: DeviceId,
        origin: Position,
        pointer_origin: Position,
    },
    Connecting {
        source: DeviceId,
    },
}

/// What a click resolved to, for the presentation adapter's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Plain selection of a device.
    Selected(DeviceId),
    /// A pending connection was completed.
    Connected { source: DeviceId, target: DeviceId },
    /// Connect mode was cancelled without a mutation.
    ConnectCancelled,
    /// Nothing happened (unknown device, wrong mode).
    Ignored,
}

/// Owns the interaction mode and the orthogonal selection state.
#[derive(Debug, Default)]
pub struct InteractionController {
    mode: InteractionMode,
    selected: Option<DeviceId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selected(&self) -> Option<DeviceId> {
        self.selected
    }

    /// Directly set the selection (presentation-driven, e.g. list click).
    pub fn select(&mut self, device: Option<DeviceId>) {
        self.selected = device;
    }

    /// Pointer-down over a device: `Idle → Dragging`.
    ///
    /// Captures the device's current position and the pointer coordinates
    /// as the drag origin. Ignored outside `Idle` and for unknown ids.
    pub fn pointer_down(&mut self, store: &TopologyStore, device: DeviceId, pointer: Position) {
        if self.mode != InteractionMode::Idle {
            debug!(%device, "pointer-down ignored: not idle");
            return;
        }
        let Some(dev) = store.device(device) else {
            debug!(%device, "pointer-down ignored: unknown device");
            return;
        };
        self.mode = InteractionMode::Dragging {
            device,
            origin: dev.position,
            pointer_origin: pointer,
        };
    }

    /// Pointer-move while dragging: reposition the dragged device.
    ///
    /// New position = origin + (pointer − pointer origin). High-frequency:
    /// only a position write, nothing is allocated.
    pub fn pointer_move(&mut self, store: &mut TopologyStore, pointer: Position) {
        let InteractionMode::Dragging {
            device,
            origin,
            pointer_origin,
        } = self.mode
        else {
            return;
        };
        store.move_device(device, origin + (pointer - pointer_origin));
    }

    /// Pointer-up: `Dragging → Idle` on every exit path, including the
    /// pointer leaving the window. No further mutation.
    pub fn pointer_up(&mut self) {
        if let InteractionMode::Dragging { device, .. } = self.mode {
            debug!(%device, "drag finished");
            self.mode = InteractionMode::Idle;
        }
    }

    /// Arm connect mode with `device` as the pending source.
    ///
    /// Invoked again while already Connecting, the new source wins.
    pub fn begin_connect(&mut self, device: DeviceId) {
        if let InteractionMode::Connecting { source } = self.mode {
            debug!(%source, new = %device, "connect mode re-armed");
        }
        self.mode = InteractionMode::Connecting { source: device };
    }

    /// A click on a device.
    ///
    /// In Connecting mode: the same device cancels; a distinct device
    /// completes the connection. Either way the mode resets to `Idle`.
    /// Outside Connecting mode this is a plain selection.
    pub fn click_device(
        &mut self,
        store: &mut TopologyStore,
        device: DeviceId,
    ) -> Result<ClickOutcome, TopologyError> {
        if let InteractionMode::Connecting { source } = self.mode {
            self.mode = InteractionMode::Idle;
            if source == device {
                debug!(%device, "connect cancelled: same device picked twice");
                return Ok(ClickOutcome::ConnectCancelled);
            }
            store.connect(source, device)?;
            return Ok(ClickOutcome::Connected {
                source,
                target: device,
            });
        }

        if store.device(device).is_none() {
            return Ok(ClickOutcome::Ignored);
        }
        self.selected = Some(device);
        Ok(ClickOutcome::Selected(device))
    }

    /// A click on empty canvas: cancels a pending connection and clears
    /// the selection.
    pub fn click_canvas(&mut self) {
        if matches!(self.mode, InteractionMode::Connecting { .. }) {
            debug!("connect cancelled: empty canvas");
            self.mode = InteractionMode::Idle;
        }
        self.selected = None;
    }
}

/// Toolbar drop: place a brand-new device where the icon landed.
///
/// Stateless -- no interaction mode is involved. The pointer coordinates
/// are translated to canvas-local by subtracting the icon-centering
/// offset before the device is created.
pub fn drop_device(
    store: &mut TopologyStore,
    kind: DeviceKind,
    pointer: Position,
    icon_offset: f64,
) -> DeviceId {
    let position = pointer - Position::new(icon_offset, icon_offset);
    store.add_device(kind, position)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::LabConfig;

    fn store() -> TopologyStore {
        TopologyStore::new(&LabConfig::default())
    }

    #[test]
    fn drag_applies_pointer_delta_to_origin() {
        let mut store = store();
        let id = store.add_device(DeviceKind::Router, Position::new(100.0, 100.0));
        let mut ctl = InteractionController::new();

        ctl.pointer_down(&store, id, Position::new(50.0, 50.0));
        ctl.pointer_move(&mut store, Position::new(80.0, 70.0));

        assert_eq!(store.device(id).unwrap().position, Position::new(130.0, 120.0));

        ctl.pointer_up();
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn drag_is_continuous_from_captured_origin() {
        let mut store = store();
        let id = store.add_device(DeviceKind::Nvr, Position::new(0.0, 0.0));
        let mut ctl = InteractionController::new();

        ctl.pointer_down(&store, id, Position::new(10.0, 10.0));
        ctl.pointer_move(&mut store, Position::new(15.0, 10.0));
        ctl.pointer_move(&mut store, Position::new(25.0, 30.0));

        // Each move is relative to the captured origin, not the last move.
        assert_eq!(store.device(id).unwrap().position, Position::new(15.0, 20.0));
    }

    #[test]
    fn pointer_down_on_unknown_device_stays_idle() {
        let store = store();
        let mut ctl = InteractionController::new();
        ctl.pointer_down(&store, DeviceId::new(7), Position::default());
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn connect_flow_completes_on_second_device() {
        let mut store = store();
        let router = store.add_device(DeviceKind::Router, Position::default());
        let switch = store.add_device(DeviceKind::Switch, Position::default());
        let mut ctl = InteractionController::new();

        ctl.begin_connect(router);
        let outcome = ctl.click_device(&mut store, switch).unwrap();

        assert_eq!(
            outcome,
            ClickOutcome::Connected {
                source: router,
                target: switch
            }
        );
        assert_eq!(ctl.mode(), InteractionMode::Idle);
        assert!(store.snapshot().are_connected(router, switch));
    }

    #[test]
    fn connect_flow_cancels_on_same_device() {
        let mut store = store();
        let router = store.add_device(DeviceKind::Router, Position::default());
        let mut ctl = InteractionController::new();

        ctl.begin_connect(router);
        let outcome = ctl.click_device(&mut store, router).unwrap();

        assert_eq!(outcome, ClickOutcome::ConnectCancelled);
        assert_eq!(ctl.mode(), InteractionMode::Idle);
        assert!(store.connections().is_empty());
    }

    #[test]
    fn canvas_click_cancels_connect_and_clears_selection() {
        let mut store = store();
        let router = store.add_device(DeviceKind::Router, Position::default());
        let mut ctl = InteractionController::new();

        ctl.click_device(&mut store, router).unwrap();
        assert_eq!(ctl.selected(), Some(router));

        ctl.begin_connect(router);
        ctl.click_canvas();

        assert_eq!(ctl.mode(), InteractionMode::Idle);
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn selection_is_orthogonal_to_drag() {
        let mut store = store();
        let cam = store.add_device(DeviceKind::IpCamera, Position::default());
        let mut ctl = InteractionController::new();

        ctl.click_device(&mut store, cam).unwrap();
        ctl.pointer_down(&store, cam, Position::new(1.0, 1.0));
        ctl.pointer_up();

        assert_eq!(ctl.selected(), Some(cam));
    }

    #[test]
    fn toolbar_drop_centers_icon_under_pointer() {
        let mut store = store();
        let id = drop_device(&mut store, DeviceKind::Workstation, Position::new(300.0, 200.0), 40.0);
        assert_eq!(store.device(id).unwrap().position, Position::new(260.0, 160.0));
    }
}
