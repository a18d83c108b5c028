//! In-memory status history

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use shared::{DeviceId, DeviceStatus, StatusChangeEvent, StatusReason};

use crate::error::ManagerResult;
use crate::traits::StatusHistory;

#[derive(Debug, Default)]
pub struct InMemoryStatusHistory {
    events: RwLock<Vec<StatusChangeEvent>>,
}

impl InMemoryStatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StatusHistory for InMemoryStatusHistory {
    async fn record(
        &self,
        device_id: DeviceId,
        old_status: DeviceStatus,
        new_status: DeviceStatus,
        reason: StatusReason,
        now: DateTime<Utc>,
    ) -> ManagerResult<StatusChangeEvent> {
        let event = StatusChangeEvent {
            device_id,
            old_status,
            new_status,
            reason,
            changed_at: now,
        };
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn for_device(&self, device_id: DeviceId) -> ManagerResult<Vec<StatusChangeEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.device_id == device_id)
            .cloned()
            .collect())
    }
}
