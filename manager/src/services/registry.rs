//! In-memory process registry
//!
//! Records are append-only; only `last_heartbeat_at` and `stopped_at` change
//! after creation. Liveness is computed against the configured window at
//! query time.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;

use shared::{DeviceId, ProcessId, ProcessRecord};

use crate::error::{ManagerError, ManagerResult};
use crate::traits::ProcessRegistry;

#[derive(Debug)]
pub struct InMemoryProcessRegistry {
    records: RwLock<Vec<ProcessRecord>>,
    liveness_window: Duration,
}

impl InMemoryProcessRegistry {
    pub fn new(liveness_window: Duration) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            liveness_window,
        }
    }

    pub fn liveness_window(&self) -> Duration {
        self.liveness_window
    }

    /// Every record, oldest first
    pub async fn all(&self) -> Vec<ProcessRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryProcessRegistry {
    fn default() -> Self {
        Self::new(Duration::seconds(10))
    }
}

#[async_trait]
impl ProcessRegistry for InMemoryProcessRegistry {
    async fn create(&self, device_id: DeviceId, now: DateTime<Utc>) -> ManagerResult<ProcessRecord> {
        let record = ProcessRecord::new(device_id, now);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn get(&self, process_id: ProcessId) -> ManagerResult<Option<ProcessRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.id == process_id)
            .cloned())
    }

    async fn heartbeat(&self, process_id: ProcessId, now: DateTime<Utc>) -> ManagerResult<ProcessRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == process_id)
            .ok_or(ManagerError::ProcessNotFound { process_id })?;

        // Stopped records never come back to life
        if record.is_open() && now > record.last_heartbeat_at {
            record.last_heartbeat_at = now;
        }
        Ok(record.clone())
    }

    async fn mark_stopped(&self, process_id: ProcessId, now: DateTime<Utc>) -> ManagerResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == process_id)
            .ok_or(ManagerError::ProcessNotFound { process_id })?;

        if record.stopped_at.is_none() {
            record.stopped_at = Some(now);
        }
        Ok(())
    }

    async fn live_processes_for(
        &self,
        device_id: DeviceId,
        now: DateTime<Utc>,
    ) -> ManagerResult<Vec<ProcessRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.device_id == device_id && record.is_live(now, self.liveness_window))
            .cloned()
            .collect())
    }

    async fn open_processes_for(&self, device_id: DeviceId) -> ManagerResult<Vec<ProcessRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.device_id == device_id && record.is_open())
            .cloned()
            .collect())
    }

    async fn latest_for(&self, device_id: DeviceId) -> ManagerResult<Option<ProcessRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|record| record.device_id == device_id)
            .cloned())
    }

    async fn live_device_ids(&self, now: DateTime<Utc>) -> ManagerResult<HashSet<DeviceId>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.is_live(now, self.liveness_window))
            .map(|record| record.device_id)
            .collect())
    }
}
