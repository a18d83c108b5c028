//! Persisted records owned by the catalog, registry, history and sink

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DeviceCategory, DeviceId, DeviceStatus, ProcessId, StatusReason};

/// A simulated device as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "device_type")]
    pub category: DeviceCategory,
    pub ip_address: String,
    pub status: DeviceStatus,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub category: DeviceCategory,
    pub ip_address: String,
    pub metadata: Option<Value>,
}

/// One row per worker invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: ProcessId,
    pub device_id: DeviceId,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
}

impl ProcessRecord {
    pub fn new(device_id: DeviceId, now: DateTime<Utc>) -> Self {
        Self {
            id: ProcessId::new(),
            device_id,
            started_at: now,
            last_heartbeat_at: now,
            stopped_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stopped_at.is_none()
    }

    /// Not stopped and heartbeat no older than `window` at `now`
    pub fn is_live(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.is_open() && now.signed_duration_since(self.last_heartbeat_at) <= window
    }
}

/// Audit row for a single status flip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub device_id: DeviceId,
    pub old_status: DeviceStatus,
    pub new_status: DeviceStatus,
    pub reason: StatusReason,
    pub changed_at: DateTime<Utc>,
}

/// Synthetic security event emitted by a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub device_id: DeviceId,
    pub username: String,
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// Transaction as persisted by the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub transaction_id: uuid::Uuid,
    #[serde(flatten)]
    pub event: TransactionEvent,
    pub created_at: DateTime<Utc>,
}

/// Filter for listing stored transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub device_id: Option<DeviceId>,
    pub event_type: Option<String>,
    #[serde(default = "TransactionQuery::default_limit")]
    pub limit: usize,
}

impl TransactionQuery {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const MAX_LIMIT: usize = 1000;

    fn default_limit() -> usize {
        Self::DEFAULT_LIMIT
    }

    pub fn for_device(device_id: DeviceId) -> Self {
        Self {
            device_id: Some(device_id),
            ..Self::default()
        }
    }

    /// Limit clamped to `1..=MAX_LIMIT`
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            device_id: None,
            event_type: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
