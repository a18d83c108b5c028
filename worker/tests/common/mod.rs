//! Common test utilities for worker integration tests

use std::time::Duration;

use shared::{DeviceCategory, DeviceId, ProcessId, WorkerMessage};
use tokio::sync::mpsc;
use tokio::time::timeout;
use worker::{WorkerAssignment, WorkerConfig};

/// Upper bound for any single wait in these tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

pub fn assignment(category: DeviceCategory) -> WorkerAssignment {
    WorkerAssignment {
        device_id: DeviceId::new(),
        process_id: ProcessId::new(),
        category,
    }
}

/// Millisecond-scale intervals so tests finish quickly
pub fn fast_config() -> WorkerConfig {
    WorkerConfig::new()
        .with_interval(Duration::from_millis(5), Duration::from_millis(15))
        .with_seed(Some(99))
}

/// Receive messages until an `Exited` arrives, returning everything seen
pub async fn collect_until_exit(rx: &mut mpsc::Receiver<WorkerMessage>) -> Vec<WorkerMessage> {
    let mut seen = Vec::new();
    loop {
        let message = timeout(TEST_TIMEOUT, rx.recv())
            .await
            .expect("worker did not exit in time")
            .expect("channel closed before exit");
        let done = matches!(message, WorkerMessage::Exited(_));
        seen.push(message);
        if done {
            return seen;
        }
    }
}
