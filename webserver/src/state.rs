//! Shared handler state

use std::time::Instant;

use manager::DeviceService;

/// State cloned into every request handler
#[derive(Clone)]
pub struct AppState {
    pub devices: DeviceService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(devices: DeviceService) -> Self {
        Self {
            devices,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
