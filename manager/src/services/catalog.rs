//! In-memory device catalog

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use shared::{Device, DeviceId, DeviceStatus, NewDevice};

use crate::error::{ManagerError, ManagerResult};
use crate::traits::DeviceCatalog;

/// Device records kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryDeviceCatalog {
    devices: RwLock<Vec<Device>>,
}

impl InMemoryDeviceCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeviceCatalog for InMemoryDeviceCatalog {
    async fn create(&self, device: NewDevice, now: DateTime<Utc>) -> ManagerResult<Device> {
        let mut devices = self.devices.write().await;

        if devices.iter().any(|existing| existing.ip_address == device.ip_address) {
            return Err(ManagerError::Conflict {
                message: format!("ip_address {} is already registered", device.ip_address),
            });
        }

        let record = Device {
            id: DeviceId::new(),
            name: device.name,
            category: device.category,
            ip_address: device.ip_address,
            status: DeviceStatus::Inactive,
            metadata: device.metadata,
            created_at: now,
            updated_at: now,
        };
        devices.push(record.clone());
        Ok(record)
    }

    async fn get(&self, device_id: DeviceId) -> ManagerResult<Device> {
        self.devices
            .read()
            .await
            .iter()
            .find(|device| device.id == device_id)
            .cloned()
            .ok_or(ManagerError::NotFound { device_id })
    }

    async fn update_status(
        &self,
        device_id: DeviceId,
        status: DeviceStatus,
        now: DateTime<Utc>,
    ) -> ManagerResult<Device> {
        let mut devices = self.devices.write().await;
        let device = devices
            .iter_mut()
            .find(|device| device.id == device_id)
            .ok_or(ManagerError::NotFound { device_id })?;

        device.status = status;
        device.updated_at = now;
        Ok(device.clone())
    }

    async fn list(&self) -> ManagerResult<Vec<Device>> {
        Ok(self.devices.read().await.iter().rev().cloned().collect())
    }
}
