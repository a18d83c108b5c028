//! Device process lifecycle manager
//!
//! Owns every decision about device status and process records. Activation,
//! deactivation, exit reconciliation and the reaper all run under the
//! per-device lock; liveness reads and event ingestion do not.
//!
//! Liveness is always derived from the process registry. The map of worker
//! handles is only a cache used to deliver stop signals.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Instant, MissedTickBehavior};

use shared::{
    component_debug, component_info, component_warn, logging, ComponentId, Device, DeviceId, DeviceStatus,
    ProcessId, ProcessRecord, StatusReason, WorkerMessage,
};
use worker::{WorkerAssignment, WorkerHandle};

use crate::config::ManagerConfig;
use crate::core::{Clock, DeviceLocks};
use crate::error::{ManagerError, ManagerResult};
use crate::services::{
    InMemoryDeviceCatalog, InMemoryProcessRegistry, InMemoryStatusHistory, InMemoryTransactionSink,
    TokioWorkerLauncher,
};
use crate::traits::{DeviceCatalog, ProcessRegistry, StatusHistory, TransactionSink, WorkerLauncher};

/// Result of an activation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub device: Device,
    pub process: ProcessRecord,
    #[serde(rename = "alreadyRunning")]
    pub already_running: bool,
}

/// Result of a deactivation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deactivation {
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Deactivation {
    pub const NOT_RUNNING: &'static str = "not_running";

    pub fn stopped() -> Self {
        Self {
            stopped: true,
            reason: None,
        }
    }

    pub fn not_running() -> Self {
        Self {
            stopped: false,
            reason: Some(Self::NOT_RUNNING.to_string()),
        }
    }
}

/// Process manager with injected collaborators
pub struct ProcessManager<C, R, H, S, L>
where
    C: DeviceCatalog + 'static,
    R: ProcessRegistry + 'static,
    H: StatusHistory + 'static,
    S: TransactionSink + 'static,
    L: WorkerLauncher + 'static,
{
    /// Injected services
    catalog: C,
    registry: R,
    history: H,
    sink: S,
    launcher: L,
    clock: Arc<dyn Clock>,

    config: ManagerConfig,
    locks: DeviceLocks,

    /// Stop-signal cache keyed by process record
    workers: Mutex<HashMap<ProcessId, WorkerHandle>>,

    /// Worker → manager ingestion channel
    ingest_tx: mpsc::Sender<WorkerMessage>,
    ingest_rx: Mutex<Option<mpsc::Receiver<WorkerMessage>>>,

    /// Shutdown signal
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

/// Manager wired to the in-memory services and tokio workers
pub type InMemoryProcessManager = ProcessManager<
    InMemoryDeviceCatalog,
    InMemoryProcessRegistry,
    InMemoryStatusHistory,
    InMemoryTransactionSink,
    TokioWorkerLauncher,
>;

impl InMemoryProcessManager {
    pub fn in_memory(config: ManagerConfig, clock: Arc<dyn Clock>) -> ManagerResult<Self> {
        let registry = InMemoryProcessRegistry::new(config.liveness_window_chrono());
        let launcher = TokioWorkerLauncher::new(config.worker.clone());
        Self::new(
            InMemoryDeviceCatalog::new(),
            registry,
            InMemoryStatusHistory::new(),
            InMemoryTransactionSink::new(),
            launcher,
            clock,
            config,
        )
    }
}

impl<C, R, H, S, L> ProcessManager<C, R, H, S, L>
where
    C: DeviceCatalog + 'static,
    R: ProcessRegistry + 'static,
    H: StatusHistory + 'static,
    S: TransactionSink + 'static,
    L: WorkerLauncher + 'static,
{
    /// Create a manager with injected dependencies
    pub fn new(
        catalog: C,
        registry: R,
        history: H,
        sink: S,
        launcher: L,
        clock: Arc<dyn Clock>,
        config: ManagerConfig,
    ) -> ManagerResult<Self> {
        config.validate()?;

        let (ingest_tx, ingest_rx) = mpsc::channel(config.ingest_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Ok(Self {
            catalog,
            registry,
            history,
            sink,
            launcher,
            clock,
            config,
            locks: DeviceLocks::new(),
            workers: Mutex::new(HashMap::new()),
            ingest_tx,
            ingest_rx: Mutex::new(Some(ingest_rx)),
            shutdown_tx,
            shutdown_rx: Mutex::new(Some(shutdown_rx)),
        })
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sender workers report on; mostly useful for tests
    pub fn ingest_sender(&self) -> mpsc::Sender<WorkerMessage> {
        self.ingest_tx.clone()
    }

    /// Get shutdown sender for external shutdown requests
    pub fn shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Number of cached worker handles
    pub async fn worker_count(&self) -> usize {
        self.workers.lock().await.len()
    }

    /// Whether the device has a live process right now
    pub async fn is_live(&self, device_id: DeviceId) -> ManagerResult<bool> {
        let live = self.registry.live_processes_for(device_id, self.clock.now()).await?;
        Ok(!live.is_empty())
    }

    /// Devices with at least one live process
    pub async fn live_device_ids(&self) -> ManagerResult<HashSet<DeviceId>> {
        self.registry.live_device_ids(self.clock.now()).await
    }

    /// Start a worker for the device unless one is already live
    pub async fn activate(&self, device_id: DeviceId) -> ManagerResult<Activation> {
        let (device, process) = {
            let _guard = self.locks.acquire(device_id).await;
            let device = self.catalog.get(device_id).await?;
            let now = self.clock.now();

            let live = self.registry.live_processes_for(device_id, now).await?;
            if let Some(existing) = live.into_iter().next() {
                component_debug!(
                    ComponentId::current(),
                    "Device {} already has live process {}",
                    device_id,
                    existing.id
                );
                return Ok(Activation {
                    device,
                    process: existing,
                    already_running: true,
                });
            }

            // Open but stale leftovers from a worker that never reported exit
            self.stop_open_records(device_id, now).await?;

            let process = self.registry.create(device_id, now).await?;
            match self
                .flip_status(&device, DeviceStatus::Active, StatusReason::UserActivate, now)
                .await
            {
                Ok(device) => (device, process),
                Err(error) => {
                    if let Err(stop_error) = self.registry.mark_stopped(process.id, now).await {
                        logging::log_error(ComponentId::current(), "Rolling back process record", &stop_error);
                    }
                    return Err(error);
                }
            }
        };

        let assignment = WorkerAssignment {
            device_id,
            process_id: process.id,
            category: device.category,
        };

        match self.launcher.launch(assignment, self.ingest_tx.clone()) {
            Ok(handle) => {
                self.workers.lock().await.insert(process.id, handle);

                // A deactivation or an early exit may have landed between commit and caching
                let closed = self
                    .registry
                    .get(process.id)
                    .await?
                    .map_or(true, |current| !current.is_open());
                let mut workers = self.workers.lock().await;
                let finished = workers.get(&process.id).map_or(false, |handle| handle.is_finished());
                if closed || finished {
                    if let Some(handle) = workers.remove(&process.id) {
                        handle.stop();
                    }
                }
                drop(workers);

                component_info!(
                    ComponentId::current(),
                    "✅ Activated {} device {} (process {})",
                    device.category,
                    device_id,
                    process.id
                );
                Ok(Activation {
                    device,
                    process,
                    already_running: false,
                })
            }
            Err(error) => {
                logging::log_error(ComponentId::current(), "Worker launch", &error);
                self.mark_inactive(device_id, StatusReason::WorkerLaunchFailed).await?;

                let device = self.catalog.get(device_id).await?;
                let process = self.registry.get(process.id).await?.unwrap_or(process);
                Ok(Activation {
                    device,
                    process,
                    already_running: false,
                })
            }
        }
    }

    /// Stop the device's worker and mark it inactive without waiting for exit
    pub async fn deactivate(&self, device_id: DeviceId) -> ManagerResult<Deactivation> {
        let _guard = self.locks.acquire(device_id).await;
        self.catalog.get(device_id).await?;
        let now = self.clock.now();

        let live = self.registry.live_processes_for(device_id, now).await?;
        if live.is_empty() {
            self.mark_inactive_locked(device_id, StatusReason::DeactivateNoWorker, now)
                .await?;
            return Ok(Deactivation::not_running());
        }

        for record in &live {
            self.signal_stop(record.id).await;
        }
        self.mark_inactive_locked(device_id, StatusReason::UserDeactivate, now)
            .await?;

        component_info!(ComponentId::current(), "🛑 Deactivated device {}", device_id);
        Ok(Deactivation::stopped())
    }

    /// Reconcile a worker that has terminated
    ///
    /// Exits from superseded processes only close their own record.
    pub async fn on_worker_exit(&self, device_id: DeviceId, process_id: ProcessId) -> ManagerResult<()> {
        self.workers.lock().await.remove(&process_id);

        let _guard = self.locks.acquire(device_id).await;
        let now = self.clock.now();

        match self.registry.mark_stopped(process_id, now).await {
            Ok(()) => {}
            Err(ManagerError::ProcessNotFound { .. }) => {
                component_warn!(
                    ComponentId::current(),
                    "⚠️ Exit reported for unknown process {} of device {}",
                    process_id,
                    device_id
                );
                return Ok(());
            }
            Err(error) => return Err(error),
        }

        let latest = self.registry.latest_for(device_id).await?;
        if latest.map(|record| record.id) != Some(process_id) {
            component_debug!(
                ComponentId::current(),
                "Ignoring exit of superseded process {} for device {}",
                process_id,
                device_id
            );
            return Ok(());
        }

        if self.registry.live_processes_for(device_id, now).await?.is_empty() {
            self.mark_inactive_locked(device_id, StatusReason::WorkerExit, now)
                .await?;
        }
        Ok(())
    }

    /// Stop every open record of the device and flip it to inactive
    ///
    /// Returns the updated device when a transition was recorded.
    pub async fn mark_inactive(&self, device_id: DeviceId, reason: StatusReason) -> ManagerResult<Option<Device>> {
        let _guard = self.locks.acquire(device_id).await;
        let now = self.clock.now();
        self.mark_inactive_locked(device_id, reason, now).await
    }

    /// Process one message from a worker
    pub async fn handle_message(&self, message: WorkerMessage) -> ManagerResult<()> {
        match message {
            WorkerMessage::Event { process_id, event } => {
                if let Err(error) = self.sink.append(event).await {
                    component_warn!(
                        ComponentId::current(),
                        "⚠️ Failed to persist event from process {}: {}",
                        process_id,
                        error
                    );
                    return Ok(());
                }

                match self.registry.heartbeat(process_id, self.clock.now()).await {
                    Ok(record) if !record.is_open() => {
                        // Record was closed under the worker; make sure it stops
                        self.signal_stop(process_id).await;
                    }
                    Ok(_) => {}
                    Err(ManagerError::ProcessNotFound { .. }) => {
                        component_warn!(
                            ComponentId::current(),
                            "⚠️ Event from unknown process {}",
                            process_id
                        );
                        self.signal_stop(process_id).await;
                    }
                    Err(error) => return Err(error),
                }
                Ok(())
            }
            WorkerMessage::Fault {
                device_id,
                process_id,
                error,
            } => {
                component_warn!(
                    ComponentId::current(),
                    "⚠️ Worker {} for device {} faulted: {}",
                    process_id,
                    device_id,
                    error
                );
                Ok(())
            }
            WorkerMessage::Exited(exit) => {
                component_debug!(
                    ComponentId::current(),
                    "Worker {} for device {} exited after {} events",
                    exit.process_id,
                    exit.device_id,
                    exit.events_emitted
                );
                self.on_worker_exit(exit.device_id, exit.process_id).await
            }
        }
    }

    /// Flip active devices whose processes all went stale
    ///
    /// Returns the number of devices marked inactive.
    pub async fn reconcile_stale(&self) -> ManagerResult<usize> {
        self.prune_finished().await;

        let live = self.registry.live_device_ids(self.clock.now()).await?;
        let mut reaped = 0;

        for device in self.catalog.list().await? {
            if device.status != DeviceStatus::Active || live.contains(&device.id) {
                continue;
            }

            let _guard = self.locks.acquire(device.id).await;
            let now = self.clock.now();
            if !self.registry.live_processes_for(device.id, now).await?.is_empty() {
                continue;
            }

            if self
                .mark_inactive_locked(device.id, StatusReason::HeartbeatExpired, now)
                .await?
                .is_some()
            {
                component_warn!(
                    ComponentId::current(),
                    "⚠️ Device {} heartbeat expired, marked inactive",
                    device.id
                );
                reaped += 1;
            }
        }

        Ok(reaped)
    }

    /// Main run loop: ingestion, periodic reaping and shutdown
    pub async fn run(&self) -> ManagerResult<()> {
        let mut ingest_rx = self
            .ingest_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ManagerError::config("run loop already started"))?;
        let mut shutdown_rx = self
            .shutdown_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ManagerError::config("run loop already started"))?;

        let mut reconcile = interval(self.config.reconcile_interval);
        reconcile.set_missed_tick_behavior(MissedTickBehavior::Skip);

        logging::log_startup(ComponentId::current(), "device process manager");

        loop {
            tokio::select! {
                Some(message) = ingest_rx.recv() => {
                    if let Err(error) = self.handle_message(message).await {
                        logging::log_error(ComponentId::current(), "Handling worker message", &error);
                    }
                }

                _ = reconcile.tick() => {
                    if let Err(error) = self.reconcile_stale().await {
                        logging::log_error(ComponentId::current(), "Stale process reconciliation", &error);
                    }
                }

                Some(_) = shutdown_rx.recv() => {
                    self.shutdown(&mut ingest_rx).await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop all workers and drain their exits within the grace period
    async fn shutdown(&self, ingest_rx: &mut mpsc::Receiver<WorkerMessage>) {
        logging::log_shutdown(ComponentId::current(), "stopping all device workers");

        self.prune_finished().await;
        for handle in self.workers.lock().await.values() {
            handle.stop();
        }

        let deadline = Instant::now() + self.config.shutdown_grace;
        while self.prune_finished().await > 0 {
            match tokio::time::timeout_at(deadline, ingest_rx.recv()).await {
                Ok(Some(message)) => {
                    if let Err(error) = self.handle_message(message).await {
                        logging::log_error(ComponentId::current(), "Handling worker message", &error);
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    let remaining = self.worker_count().await;
                    component_warn!(
                        ComponentId::current(),
                        "⚠️ {} workers did not exit within {:?}",
                        remaining,
                        self.config.shutdown_grace
                    );
                    break;
                }
            }
        }

        while let Ok(message) = ingest_rx.try_recv() {
            if let Err(error) = self.handle_message(message).await {
                logging::log_error(ComponentId::current(), "Handling worker message", &error);
            }
        }

        logging::log_success(ComponentId::current(), "Process manager shutdown complete");
    }

    /// Caller must hold the device lock
    async fn mark_inactive_locked(
        &self,
        device_id: DeviceId,
        reason: StatusReason,
        now: DateTime<Utc>,
    ) -> ManagerResult<Option<Device>> {
        self.stop_open_records(device_id, now).await?;

        let device = self.catalog.get(device_id).await?;
        if device.status == DeviceStatus::Inactive {
            return Ok(None);
        }

        let device = self.flip_status(&device, DeviceStatus::Inactive, reason, now).await?;
        component_debug!(
            ComponentId::current(),
            "Device {} marked inactive ({})",
            device_id,
            reason
        );
        Ok(Some(device))
    }

    async fn stop_open_records(&self, device_id: DeviceId, now: DateTime<Utc>) -> ManagerResult<()> {
        for record in self.registry.open_processes_for(device_id).await? {
            self.registry.mark_stopped(record.id, now).await?;
            self.signal_stop(record.id).await;
        }
        Ok(())
    }

    /// Persist a new status and its audit row; no-op when nothing changes
    async fn flip_status(
        &self,
        device: &Device,
        status: DeviceStatus,
        reason: StatusReason,
        now: DateTime<Utc>,
    ) -> ManagerResult<Device> {
        if device.status == status {
            return Ok(device.clone());
        }

        let updated = self.catalog.update_status(device.id, status, now).await?;
        if let Err(error) = self
            .history
            .record(device.id, device.status, status, reason, now)
            .await
        {
            // Status and audit row commit together or not at all
            if let Err(restore_error) = self.catalog.update_status(device.id, device.status, now).await {
                logging::log_error(ComponentId::current(), "Restoring device status", &restore_error);
            }
            return Err(error);
        }
        Ok(updated)
    }

    /// Drop handles of tasks that already finished; returns how many remain
    async fn prune_finished(&self) -> usize {
        let mut workers = self.workers.lock().await;
        workers.retain(|_, handle| !handle.is_finished());
        workers.len()
    }

    async fn signal_stop(&self, process_id: ProcessId) {
        if let Some(handle) = self.workers.lock().await.get(&process_id) {
            handle.stop();
        }
    }
}
