// ── Lab session facade ──
//
// One handle wiring the whole core together: the topology store, the
// interaction controller, and the task engine live behind a single
// mutex, so a mutation and its completion check can never interleave
// with another action. Curriculum events go out over a broadcast
// channel; the snapshot watch channel is the store's own.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::LabConfig;
use crate::curriculum::{default_curriculum, Task, TaskAdvance, TaskEngine, TaskView};
use crate::error::SessionError;
use crate::interact::{self, ClickOutcome, InteractionController, InteractionMode};
use crate::model::{
    DeviceId, DeviceKind, DeviceStatus, EditableField, FirewallRule, Position, VlanId,
};
use crate::progress::{MemoryProgress, ProgressStore};
use crate::snapshot::TopologySnapshot;
use crate::store::TopologyStore;

const EVENT_CHANNEL_SIZE: usize = 64;

/// Curriculum-side notifications for the presentation adapter.
///
/// Topology changes are not mirrored here -- subscribe to the snapshot
/// channel for those.
#[derive(Debug, Clone)]
pub enum LabEvent {
    /// The active task changed.
    TaskAdvanced(TaskAdvance),
    /// A simulated reboot finished and the device is back online.
    DeviceRebooted(DeviceId),
}

/// The main entry point for embedding the lab core.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Every mutating entry point
/// locks the state, applies the mutation, re-checks the active task
/// against the fresh snapshot, and publishes events before unlocking.
#[derive(Clone)]
pub struct LabSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: LabConfig,
    state: Mutex<LabState>,
    events: broadcast::Sender<LabEvent>,
    /// Pending reboot completions, keyed by device. Starting a new reboot
    /// aborts the previous handle, so at most one completion ever fires.
    reboots: Mutex<HashMap<DeviceId, JoinHandle<()>>>,
}

struct LabState {
    store: TopologyStore,
    interaction: InteractionController,
    engine: TaskEngine,
    progress: Box<dyn ProgressStore + Send>,
}

impl SessionInner {
    /// Re-check the active task against the freshest snapshot. Called
    /// inside the state lock after every entry point that may have
    /// mutated the store.
    fn note_mutation(&self, state: &mut LabState) {
        let snapshot = state.store.snapshot();
        if let Some(advance) = state.engine.check_completion(&snapshot) {
            state.progress.set(advance.completed_key, true);
            let _ = self.events.send(LabEvent::TaskAdvanced(advance));
        }
    }
}

impl LabSession {
    /// A fresh session running the built-in curriculum with in-memory
    /// progress.
    pub fn new(config: LabConfig) -> Self {
        Self::with_curriculum(config, default_curriculum(), Box::new(MemoryProgress::new()))
    }

    /// A session over a custom task list and progress backend.
    pub fn with_curriculum(
        config: LabConfig,
        tasks: Vec<Task>,
        progress: Box<dyn ProgressStore + Send>,
    ) -> Self {
        info!(tasks = tasks.len(), "lab session created");
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let store = TopologyStore::new(&config);

        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(LabState {
                    store,
                    interaction: InteractionController::new(),
                    engine: TaskEngine::new(tasks),
                    progress,
                }),
                events,
                reboots: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &LabConfig {
        &self.inner.config
    }

    /// Curriculum event stream.
    pub fn events(&self) -> broadcast::Receiver<LabEvent> {
        self.inner.events.subscribe()
    }

    /// The single "state changed" notification: a receiver yielding the
    /// full current snapshot after every mutation.
    pub async fn subscribe(&self) -> watch::Receiver<Arc<TopologySnapshot>> {
        self.inner.state.lock().await.store.subscribe()
    }

    pub async fn snapshot(&self) -> Arc<TopologySnapshot> {
        self.inner.state.lock().await.store.snapshot()
    }

    pub async fn active_task(&self) -> Option<TaskView> {
        self.inner.state.lock().await.engine.active_view()
    }

    /// Recorded completion flag for a task key.
    pub async fn progress(&self, key: &str) -> Option<bool> {
        self.inner.state.lock().await.progress.get(key)
    }

    pub async fn selected(&self) -> Option<DeviceId> {
        self.inner.state.lock().await.interaction.selected()
    }

    /// Current interaction mode, for connect-affordance rendering.
    pub async fn interaction_mode(&self) -> InteractionMode {
        self.inner.state.lock().await.interaction.mode()
    }

    // ── Canvas input ─────────────────────────────────────────────────

    /// Toolbar drop: create a device of `kind` under the pointer.
    pub async fn drop_device(&self, kind: DeviceKind, pointer: Position) -> DeviceId {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let id = interact::drop_device(&mut state.store, kind, pointer, self.inner.config.icon_offset);
        self.inner.note_mutation(state);
        id
    }

    pub async fn pointer_down(&self, device: DeviceId, pointer: Position) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.interaction.pointer_down(&state.store, device, pointer);
    }

    pub async fn pointer_move(&self, pointer: Position) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.interaction.pointer_move(&mut state.store, pointer);
        self.inner.note_mutation(state);
    }

    pub async fn pointer_up(&self) {
        self.inner.state.lock().await.interaction.pointer_up();
    }

    pub async fn begin_connect(&self, device: DeviceId) {
        self.inner.state.lock().await.interaction.begin_connect(device);
    }

    pub async fn click_device(&self, device: DeviceId) -> Result<ClickOutcome, SessionError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let outcome = state.interaction.click_device(&mut state.store, device)?;
        if matches!(outcome, ClickOutcome::Connected { .. }) {
            self.inner.note_mutation(state);
        }
        Ok(outcome)
    }

    pub async fn click_canvas(&self) {
        self.inner.state.lock().await.interaction.click_canvas();
    }

    pub async fn select(&self, device: Option<DeviceId>) {
        self.inner.state.lock().await.interaction.select(device);
    }

    // ── Config panel ─────────────────────────────────────────────────

    /// Update one of a device's mutable fields.
    ///
    /// Syntax and duplicate-address validation happen here, before any
    /// store mutation; the store itself only enforces the per-kind
    /// editable-field table.
    pub async fn update_device_field(
        &self,
        device: DeviceId,
        field: EditableField,
        value: &str,
    ) -> Result<(), SessionError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        match field {
            EditableField::Ip | EditableField::Gateway => validate_ipv4(value)?,
            EditableField::Subnet => validate_subnet(value)?,
            EditableField::Name => {}
        }
        if field == EditableField::Ip {
            if let Some(existing) = state
                .store
                .devices()
                .find(|d| d.id != device && d.ip.as_deref() == Some(value))
            {
                return Err(SessionError::DuplicateIp {
                    ip: value.to_owned(),
                    device: existing.name.clone(),
                });
            }
        }

        state.store.update_device_field(device, field, value);
        self.inner.note_mutation(state);
        Ok(())
    }

    // ── VLANs and firewall ───────────────────────────────────────────

    pub async fn add_vlan(&self, name: &str) -> Result<VlanId, SessionError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let id = state.store.add_vlan(name)?;
        self.inner.note_mutation(state);
        Ok(id)
    }

    pub async fn set_port_vlan(&self, switch: DeviceId, port_index: u8, vlan: VlanId) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.store.set_port_vlan(switch, port_index, vlan);
        self.inner.note_mutation(state);
    }

    pub async fn add_firewall_rule(&self, rule: FirewallRule) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.store.add_firewall_rule(rule);
        self.inner.note_mutation(state);
    }

    pub async fn remove_firewall_rule(&self, index: usize) {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.store.remove_firewall_rule(index);
        self.inner.note_mutation(state);
    }

    // ── Simulated device actions ─────────────────────────────────────

    /// Start a simulated reboot: the device goes `Rebooting` now and
    /// comes back `Online` after the configured delay.
    ///
    /// Pending completions are keyed by device -- rebooting a device that
    /// is already rebooting cancels the earlier completion, so the later
    /// deadline wins deterministically.
    pub async fn reboot_device(&self, device: DeviceId) {
        {
            let mut guard = self.inner.state.lock().await;
            let state = &mut *guard;
            if state.store.device(device).is_none() {
                debug!(%device, "reboot ignored: unknown device");
                return;
            }
            state.store.set_device_status(device, DeviceStatus::Rebooting);
            self.inner.note_mutation(state);
        }

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.reboot_delay();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut guard = inner.state.lock().await;
                guard.store.set_device_status(device, DeviceStatus::Online);
                inner.note_mutation(&mut guard);
            }
            debug!(%device, "reboot finished");
            let _ = inner.events.send(LabEvent::DeviceRebooted(device));
        });

        if let Some(previous) = self.inner.reboots.lock().await.insert(device, handle) {
            debug!(%device, "previous pending reboot cancelled");
            previous.abort();
        }
    }
}

// ── Boundary validation helpers ──────────────────────────────────────

fn validate_ipv4(value: &str) -> Result<(), SessionError> {
    if value.parse::<Ipv4Addr>().is_ok() {
        Ok(())
    } else {
        Err(SessionError::InvalidIp {
            value: value.to_owned(),
        })
    }
}

fn validate_subnet(value: &str) -> Result<(), SessionError> {
    let ok = match value.split_once('/') {
        Some((addr, prefix)) => {
            addr.parse::<Ipv4Addr>().is_ok() && prefix.parse::<u8>().is_ok_and(|p| p <= 32)
        }
        None => value.parse::<Ipv4Addr>().is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(SessionError::InvalidSubnet {
            value: value.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    async fn settle() {
        // Give spawned reboot tasks a chance to run on the test runtime.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn status_of(session: &LabSession, id: DeviceId) -> DeviceStatus {
        session.snapshot().await.device(id).unwrap().status
    }

    #[tokio::test]
    async fn task_advance_emits_event_and_records_progress() {
        let session = LabSession::new(LabConfig::default());
        let mut events = session.events();

        session
            .drop_device(DeviceKind::Router, Position::new(50.0, 50.0))
            .await;

        let LabEvent::TaskAdvanced(advance) = events.recv().await.unwrap() else {
            panic!("expected a task advance");
        };
        assert_eq!(advance.completed_key, "place-router");
        assert_eq!(advance.active.key, "place-switch");
        assert_eq!(session.progress("place-router").await, Some(true));
    }

    #[tokio::test]
    async fn malformed_ip_rejected_without_mutation() {
        let session = LabSession::new(LabConfig::default());
        let cam = session
            .drop_device(DeviceKind::IpCamera, Position::default())
            .await;

        let err = session
            .update_device_field(cam, EditableField::Ip, "299.0.0.1")
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::InvalidIp { .. }));
        assert_eq!(session.snapshot().await.device(cam).unwrap().ip, None);
    }

    #[tokio::test]
    async fn duplicate_ip_rejected_at_boundary() {
        let session = LabSession::new(LabConfig::default());
        let first = session
            .drop_device(DeviceKind::IpCamera, Position::default())
            .await;
        let second = session
            .drop_device(DeviceKind::IpCamera, Position::default())
            .await;

        session
            .update_device_field(first, EditableField::Ip, "192.168.10.20")
            .await
            .unwrap();
        let err = session
            .update_device_field(second, EditableField::Ip, "192.168.10.20")
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::DuplicateIp { .. }));
        assert_eq!(session.snapshot().await.device(second).unwrap().ip, None);

        // Re-writing a device's own address is not a duplicate.
        session
            .update_device_field(first, EditableField::Ip, "192.168.10.20")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subnet_accepts_mask_and_cidr() {
        let session = LabSession::new(LabConfig::default());
        let nvr = session.drop_device(DeviceKind::Nvr, Position::default()).await;

        session
            .update_device_field(nvr, EditableField::Subnet, "255.255.255.0")
            .await
            .unwrap();
        session
            .update_device_field(nvr, EditableField::Subnet, "192.168.10.0/24")
            .await
            .unwrap();
        let err = session
            .update_device_field(nvr, EditableField::Subnet, "192.168.10.0/99")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidSubnet { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn reboot_returns_online_after_delay() {
        let session = LabSession::new(LabConfig::default());
        let router = session
            .drop_device(DeviceKind::Router, Position::default())
            .await;

        session.reboot_device(router).await;
        assert_eq!(status_of(&session, router).await, DeviceStatus::Rebooting);

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        settle().await;
        assert_eq!(status_of(&session, router).await, DeviceStatus::Online);
    }

    #[tokio::test(start_paused = true)]
    async fn retriggered_reboot_cancels_the_pending_completion() {
        let session = LabSession::new(LabConfig::default());
        let cam = session
            .drop_device(DeviceKind::IpCamera, Position::default())
            .await;

        session.reboot_device(cam).await;
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        session.reboot_device(cam).await;

        // Past the first deadline: the aborted completion must not fire.
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        settle().await;
        assert_eq!(status_of(&session, cam).await, DeviceStatus::Rebooting);

        // Past the second deadline the device is back.
        tokio::time::sleep(Duration::from_millis(600)).await;
        settle().await;
        assert_eq!(status_of(&session, cam).await, DeviceStatus::Online);
    }

    #[tokio::test]
    async fn reboot_of_unknown_device_is_ignored() {
        let session = LabSession::new(LabConfig::default());
        session.reboot_device(DeviceId::new(99)).await;
        assert!(session.snapshot().await.devices.is_empty());
    }
}
