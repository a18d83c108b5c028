//! Core types used throughout the simulator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::errors::SharedError;

mod records;

pub use records::{
    Device, NewDevice, ProcessRecord, StatusChangeEvent, StoredTransaction, TransactionEvent, TransactionQuery,
};

/// Global component ID singleton - set once at startup
static COMPONENT_ID: OnceLock<ComponentId> = OnceLock::new();

/// Component identifier attached to every log line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// Lifecycle manager embedded in a host process
    Manager,
    /// HTTP front door process
    WebServer,
}

impl ComponentId {
    /// Initialize the global component ID for the webserver binary
    pub fn init_webserver() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::WebServer)
    }

    /// Initialize the global component ID for an embedded manager
    pub fn init_manager() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Manager)
    }

    /// Get the global component ID, defaulting to the manager when unset
    pub fn current() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Manager)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Manager => write!(f, "manager"),
            ComponentId::WebServer => write!(f, "webserver"),
        }
    }
}

/// Unique identifier for a simulated device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, SharedError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Unique identifier for one worker invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(Uuid);

impl ProcessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, SharedError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of simulated device kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    AccessController,
    FaceReader,
    Anpr,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 3] = [
        DeviceCategory::AccessController,
        DeviceCategory::FaceReader,
        DeviceCategory::Anpr,
    ];

    /// Stable key used in storage, payload selection and the HTTP API
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::AccessController => "access_controller",
            DeviceCategory::FaceReader => "face_reader",
            DeviceCategory::Anpr => "anpr",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "access_controller" => Ok(DeviceCategory::AccessController),
            "face_reader" => Ok(DeviceCategory::FaceReader),
            "anpr" => Ok(DeviceCategory::Anpr),
            _ => Err(SharedError::UnknownCategory { input: s.to_string() }),
        }
    }
}

/// Persisted activation status of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    Inactive,
    Active,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Inactive => "inactive",
            DeviceStatus::Active => "active",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inactive" => Ok(DeviceStatus::Inactive),
            "active" => Ok(DeviceStatus::Active),
            _ => Err(SharedError::UnknownStatus { input: s.to_string() }),
        }
    }
}

/// Reason code attached to a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReason {
    UserActivate,
    UserDeactivate,
    WorkerExit,
    WorkerLaunchFailed,
    DeactivateNoWorker,
    HeartbeatExpired,
}

impl StatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusReason::UserActivate => "user_activate",
            StatusReason::UserDeactivate => "user_deactivate",
            StatusReason::WorkerExit => "worker_exit",
            StatusReason::WorkerLaunchFailed => "worker_launch_failed",
            StatusReason::DeactivateNoWorker => "deactivate_no_worker",
            StatusReason::HeartbeatExpired => "heartbeat_expired",
        }
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
