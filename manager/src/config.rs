//! Lifecycle manager configuration

use std::time::Duration;
use worker::WorkerConfig;

use crate::error::{ManagerError, ManagerResult};

/// Tunables for the process manager and its workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Maximum heartbeat age before a process counts as dead
    pub liveness_window: Duration,
    /// How often the stale-process reaper runs
    pub reconcile_interval: Duration,
    /// Capacity of the worker → manager ingestion channel
    pub ingest_capacity: usize,
    /// How long shutdown waits for workers to report exit
    pub shutdown_grace: Duration,
    /// Settings handed to every launched worker
    pub worker: WorkerConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            liveness_window: Duration::from_secs(10),
            reconcile_interval: Duration::from_secs(5),
            ingest_capacity: 1024,
            shutdown_grace: Duration::from_secs(5),
            worker: WorkerConfig::default(),
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the liveness window (fluent API)
    pub fn with_liveness_window(mut self, window: Duration) -> Self {
        self.liveness_window = window;
        self
    }

    /// Configure the reaper interval (fluent API)
    pub fn with_reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }

    /// Configure the ingestion channel capacity (fluent API)
    pub fn with_ingest_capacity(mut self, capacity: usize) -> Self {
        self.ingest_capacity = capacity;
        self
    }

    /// Configure the shutdown grace period (fluent API)
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Configure worker settings (fluent API)
    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Liveness window as a signed chrono duration for timestamp arithmetic
    pub fn liveness_window_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.liveness_window).unwrap_or(chrono::Duration::MAX)
    }

    pub fn validate(&self) -> ManagerResult<()> {
        if self.liveness_window.is_zero() {
            return Err(ManagerError::config("liveness_window must be greater than zero"));
        }
        if self.reconcile_interval.is_zero() {
            return Err(ManagerError::config("reconcile_interval must be greater than zero"));
        }
        if self.ingest_capacity == 0 {
            return Err(ManagerError::config("ingest_capacity must be greater than zero"));
        }
        if self.worker.max_interval >= self.liveness_window {
            return Err(ManagerError::config(
                "worker max_interval must be shorter than liveness_window",
            ));
        }
        self.worker.validate()?;
        Ok(())
    }
}
