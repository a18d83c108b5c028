//! Device process lifecycle manager
//!
//! Decides whether a device has a live worker, starts and stops workers under
//! a per-device lock, reconciles worker exit with device status and exposes
//! the heartbeat-derived liveness signal. Collaborators (catalog, process
//! registry, status history, transaction sink, worker launcher) are injected
//! through the traits in [`traits`].

pub mod config;
pub mod core;
pub mod device_service;
pub mod error;
pub mod process_manager;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::ManagerConfig;
pub use crate::core::{Clock, DeviceLocks, ManualClock, SystemClock};
pub use device_service::{CreateDeviceRequest, DeviceService, DeviceView};
pub use error::{ManagerError, ManagerResult};
pub use process_manager::{Activation, Deactivation, InMemoryProcessManager, ProcessManager};
pub use traits::{DeviceCatalog, ProcessRegistry, StatusHistory, TransactionSink, WorkerLauncher};
