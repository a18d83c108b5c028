//! Per-device exclusive locks
//!
//! Holding a device's guard is the transaction scope for activation,
//! deactivation, exit reconciliation and the reaper. Locks for different
//! devices never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use shared::DeviceId;

#[derive(Debug, Default)]
pub struct DeviceLocks {
    locks: Mutex<HashMap<DeviceId, Arc<Mutex<()>>>>,
}

impl DeviceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one device
    pub async fn acquire(&self, device_id: DeviceId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(device_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of devices that have ever been locked
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
