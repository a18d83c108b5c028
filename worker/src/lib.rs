//! Device worker library for the activity simulator
//!
//! A worker is one independently scheduled task bound to a single device.
//! It sleeps a random interval, asks its event source for a synthetic
//! security event and ships it to the lifecycle manager until told to stop.

pub mod config;
pub mod core;
pub mod error;
pub mod handle;
pub mod traits;
pub mod worker;

// Re-export main types
pub use config::WorkerConfig;
pub use crate::core::{EventGenerator, GeneratedEvent};
pub use error::{WorkerError, WorkerResult};
pub use handle::{spawn_worker, WorkerHandle};
pub use traits::{EventSource, MockEventSource};
pub use worker::{DeviceWorker, WorkerAssignment, WorkerState};
