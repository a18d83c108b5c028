//! Test helpers and builders for manager tests

use std::future::Future;
use std::sync::Arc;

use manager::{
    Clock, DeviceCatalog, InMemoryProcessManager, ManagerConfig, ManualClock, StatusHistory, SystemClock,
};
use shared::{Device, DeviceCategory, DeviceId, StatusReason};
use tokio::time::{sleep, timeout, Duration};

use super::fixtures::{TestFixtures, TEST_TIMEOUT};

/// Builder for in-memory managers
pub struct ManagerBuilder {
    config: ManagerConfig,
    clock: Arc<dyn Clock>,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: TestFixtures::fast_config(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Arc<InMemoryProcessManager> {
        Arc::new(InMemoryProcessManager::in_memory(self.config, self.clock).expect("valid test config"))
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Manager on a manual clock with workers that never emit during the test
    pub fn manual_manager() -> (Arc<InMemoryProcessManager>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(TestFixtures::start_time()));
        let manager = ManagerBuilder::new()
            .with_config(TestFixtures::quiet_config())
            .with_clock(clock.clone())
            .build();
        (manager, clock)
    }

    pub async fn register(manager: &InMemoryProcessManager, category: DeviceCategory, ip: &str) -> Device {
        manager
            .catalog()
            .create(TestFixtures::new_device(category, ip), manager.now())
            .await
            .expect("device registration")
    }

    pub async fn reasons(manager: &InMemoryProcessManager, device_id: DeviceId) -> Vec<StatusReason> {
        manager
            .history()
            .for_device(device_id)
            .await
            .expect("history read")
            .into_iter()
            .map(|row| row.reason)
            .collect()
    }

    /// Poll `check` until it returns true or the test timeout elapses
    pub async fn eventually<F, Fut>(mut check: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        timeout(TEST_TIMEOUT, async {
            loop {
                if check().await {
                    return;
                }
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .is_ok()
    }
}
