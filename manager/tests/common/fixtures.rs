//! Test fixtures for manager tests

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use manager::{CreateDeviceRequest, ManagerConfig};
use shared::{DeviceCategory, NewDevice};
use worker::WorkerConfig;

/// Upper bound for any single wait in these tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestFixtures;

impl TestFixtures {
    /// Fixed start instant for manual clocks
    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    /// Workers that emit every few milliseconds
    pub fn fast_worker_config() -> WorkerConfig {
        WorkerConfig::new()
            .with_interval(Duration::from_millis(5), Duration::from_millis(15))
            .with_seed(Some(7))
    }

    /// Workers that stay quiet for the length of a test
    pub fn quiet_worker_config() -> WorkerConfig {
        WorkerConfig::new()
            .with_interval(Duration::from_secs(5), Duration::from_secs(5))
            .with_seed(Some(7))
    }

    pub fn fast_config() -> ManagerConfig {
        ManagerConfig::new()
            .with_worker(Self::fast_worker_config())
            .with_reconcile_interval(Duration::from_millis(50))
            .with_shutdown_grace(Duration::from_secs(2))
    }

    pub fn quiet_config() -> ManagerConfig {
        ManagerConfig::new().with_worker(Self::quiet_worker_config())
    }

    pub fn new_device(category: DeviceCategory, ip: &str) -> NewDevice {
        NewDevice {
            name: format!("{category} at {ip}"),
            category,
            ip_address: ip.to_string(),
            metadata: None,
        }
    }

    pub fn create_request(category: DeviceCategory, ip: &str) -> CreateDeviceRequest {
        CreateDeviceRequest::new(&format!("{category} at {ip}"), category.as_str(), ip)
    }
}
