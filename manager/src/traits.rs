//! Trait definitions with mockall annotations for testing
//!
//! Every collaborator of the process manager sits behind one of these traits
//! so the lifecycle logic can be exercised with in-memory services or mocks.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use shared::{
    Device, DeviceId, DeviceStatus, NewDevice, ProcessId, ProcessRecord, StatusChangeEvent, StatusReason,
    StoredTransaction, TransactionEvent, TransactionQuery, WorkerMessage,
};
use worker::{WorkerAssignment, WorkerHandle};

use crate::error::ManagerResult;

/// Persisted device records
#[mockall::automock]
#[async_trait::async_trait]
pub trait DeviceCatalog: Send + Sync {
    /// Insert a new device; always starts `inactive`
    async fn create(&self, device: NewDevice, now: DateTime<Utc>) -> ManagerResult<Device>;

    /// Fetch a device or fail with `NotFound`
    async fn get(&self, device_id: DeviceId) -> ManagerResult<Device>;

    /// Persist a new status and return the updated record
    async fn update_status(
        &self,
        device_id: DeviceId,
        status: DeviceStatus,
        now: DateTime<Utc>,
    ) -> ManagerResult<Device>;

    /// All devices, newest first
    async fn list(&self) -> ManagerResult<Vec<Device>>;
}

/// One record per worker invocation
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessRegistry: Send + Sync {
    /// Create a running record with `last_heartbeat_at = started_at = now`
    async fn create(&self, device_id: DeviceId, now: DateTime<Utc>) -> ManagerResult<ProcessRecord>;

    async fn get(&self, process_id: ProcessId) -> ManagerResult<Option<ProcessRecord>>;

    /// Bump the heartbeat of an open record; returns the record after the update
    async fn heartbeat(&self, process_id: ProcessId, now: DateTime<Utc>) -> ManagerResult<ProcessRecord>;

    /// Stop a record; stopping an already stopped record is a no-op
    async fn mark_stopped(&self, process_id: ProcessId, now: DateTime<Utc>) -> ManagerResult<()>;

    /// Records not stopped and with a heartbeat inside the liveness window
    async fn live_processes_for(&self, device_id: DeviceId, now: DateTime<Utc>)
        -> ManagerResult<Vec<ProcessRecord>>;

    /// Records not stopped, whatever their heartbeat age
    async fn open_processes_for(&self, device_id: DeviceId) -> ManagerResult<Vec<ProcessRecord>>;

    /// Most recently created record for a device
    async fn latest_for(&self, device_id: DeviceId) -> ManagerResult<Option<ProcessRecord>>;

    /// Devices that currently have at least one live record
    async fn live_device_ids(&self, now: DateTime<Utc>) -> ManagerResult<HashSet<DeviceId>>;
}

/// Append-only audit log of status transitions
#[mockall::automock]
#[async_trait::async_trait]
pub trait StatusHistory: Send + Sync {
    /// Append one row; callers guarantee `old != new`
    async fn record(
        &self,
        device_id: DeviceId,
        old_status: DeviceStatus,
        new_status: DeviceStatus,
        reason: StatusReason,
        now: DateTime<Utc>,
    ) -> ManagerResult<StatusChangeEvent>;

    /// Rows for one device in the order they were recorded
    async fn for_device(&self, device_id: DeviceId) -> ManagerResult<Vec<StatusChangeEvent>>;
}

/// Append-only log of emitted events
#[mockall::automock]
#[async_trait::async_trait]
pub trait TransactionSink: Send + Sync {
    async fn append(&self, event: TransactionEvent) -> ManagerResult<StoredTransaction>;

    /// Matching transactions, newest timestamp first
    async fn query(&self, query: TransactionQuery) -> ManagerResult<Vec<StoredTransaction>>;
}

/// Starts worker units of execution
#[mockall::automock]
pub trait WorkerLauncher: Send + Sync {
    /// Start a worker bound to `assignment` that reports on `outbound`
    fn launch(
        &self,
        assignment: WorkerAssignment,
        outbound: mpsc::Sender<WorkerMessage>,
    ) -> ManagerResult<WorkerHandle>;
}
