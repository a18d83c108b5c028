//! Front-door operations over the catalog and the process manager

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared::{
    component_info, ComponentId, Device, DeviceCategory, DeviceId, NewDevice, StatusChangeEvent,
    StoredTransaction, TransactionQuery,
};

use crate::error::{ManagerError, ManagerResult};
use crate::process_manager::{Activation, Deactivation, ProcessManager};
use crate::services::{
    InMemoryDeviceCatalog, InMemoryProcessRegistry, InMemoryStatusHistory, InMemoryTransactionSink,
    TokioWorkerLauncher,
};
use crate::traits::{DeviceCatalog, ProcessRegistry, StatusHistory, TransactionSink, WorkerLauncher};

/// Raw create request; every field is optional so validation can name what is missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub metadata: Option<Value>,
}

impl CreateDeviceRequest {
    pub fn new(name: &str, device_type: &str, ip_address: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            device_type: Some(device_type.to_string()),
            ip_address: Some(ip_address.to_string()),
            metadata: None,
        }
    }

    /// Configure metadata (fluent API)
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn validate(self) -> ManagerResult<NewDevice> {
        let name = required("name", self.name)?;
        let device_type = required("device_type", self.device_type)?;
        let ip_address = required("ip_address", self.ip_address)?;

        let category: DeviceCategory = device_type
            .parse()
            .map_err(|_| ManagerError::validation("device_type", format!("unknown device type '{device_type}'")))?;

        let ip: IpAddr = ip_address
            .parse()
            .map_err(|_| ManagerError::validation("ip_address", format!("'{ip_address}' is not an IP address")))?;

        Ok(NewDevice {
            name,
            category,
            ip_address: ip.to_string(),
            metadata: self.metadata.filter(|metadata| !metadata.is_null()),
        })
    }
}

fn required(field: &str, value: Option<String>) -> ManagerResult<String> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ManagerError::validation(field, "is required")),
    }
}

/// Device annotated with runtime liveness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub device: Device,
    pub live_active: bool,
}

/// Device operations exposed to the HTTP layer
pub struct DeviceService<
    C = InMemoryDeviceCatalog,
    R = InMemoryProcessRegistry,
    H = InMemoryStatusHistory,
    S = InMemoryTransactionSink,
    L = TokioWorkerLauncher,
> where
    C: DeviceCatalog + 'static,
    R: ProcessRegistry + 'static,
    H: StatusHistory + 'static,
    S: TransactionSink + 'static,
    L: WorkerLauncher + 'static,
{
    manager: Arc<ProcessManager<C, R, H, S, L>>,
}

impl<C, R, H, S, L> Clone for DeviceService<C, R, H, S, L>
where
    C: DeviceCatalog + 'static,
    R: ProcessRegistry + 'static,
    H: StatusHistory + 'static,
    S: TransactionSink + 'static,
    L: WorkerLauncher + 'static,
{
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<C, R, H, S, L> DeviceService<C, R, H, S, L>
where
    C: DeviceCatalog + 'static,
    R: ProcessRegistry + 'static,
    H: StatusHistory + 'static,
    S: TransactionSink + 'static,
    L: WorkerLauncher + 'static,
{
    pub fn new(manager: Arc<ProcessManager<C, R, H, S, L>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<ProcessManager<C, R, H, S, L>> {
        &self.manager
    }

    /// Register a device; new devices are always inactive
    pub async fn create_device(&self, request: CreateDeviceRequest) -> ManagerResult<Device> {
        let new_device = request.validate()?;
        let device = self.manager.catalog().create(new_device, self.manager.now()).await?;

        component_info!(
            ComponentId::current(),
            "📟 Registered {} device '{}' at {}",
            device.category,
            device.name,
            device.ip_address
        );
        Ok(device)
    }

    /// All devices newest first, annotated with `live_active`
    pub async fn list_devices(&self) -> ManagerResult<Vec<DeviceView>> {
        let live = self.manager.live_device_ids().await?;
        let devices = self.manager.catalog().list().await?;

        Ok(devices
            .into_iter()
            .map(|device| DeviceView {
                live_active: live.contains(&device.id),
                device,
            })
            .collect())
    }

    pub async fn get_device(&self, device_id: DeviceId) -> ManagerResult<DeviceView> {
        let device = self.manager.catalog().get(device_id).await?;
        let live_active = self.manager.is_live(device_id).await?;
        Ok(DeviceView { device, live_active })
    }

    pub async fn activate_device(&self, device_id: DeviceId) -> ManagerResult<Activation> {
        self.manager.activate(device_id).await
    }

    pub async fn deactivate_device(&self, device_id: DeviceId) -> ManagerResult<Deactivation> {
        self.manager.deactivate(device_id).await
    }

    /// Status transitions of one device, oldest first
    pub async fn history(&self, device_id: DeviceId) -> ManagerResult<Vec<StatusChangeEvent>> {
        self.manager.catalog().get(device_id).await?;
        self.manager.history().for_device(device_id).await
    }

    pub async fn list_transactions(&self, query: TransactionQuery) -> ManagerResult<Vec<StoredTransaction>> {
        self.manager.sink().query(query).await
    }
}
