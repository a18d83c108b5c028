//! Service-specific tests
//!
//! One file per in-memory service plus the worker launcher.

mod catalog;

// Common test utilities for services
pub mod common {
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use shared::{DeviceCategory, DeviceId, NewDevice, TransactionEvent};

    /// Fixed instant so timestamps in assertions are predictable
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    pub fn new_device(name: &str, ip: &str, category: DeviceCategory) -> NewDevice {
        NewDevice {
            name: name.to_string(),
            category,
            ip_address: ip.to_string(),
            metadata: None,
        }
    }

    pub fn event(device_id: DeviceId, event_type: &str, timestamp: DateTime<Utc>) -> TransactionEvent {
        TransactionEvent {
            device_id,
            username: "alice".to_string(),
            event_type: event_type.to_string(),
            payload: json!({ "door_id": "A1" }),
            timestamp,
        }
    }
}
