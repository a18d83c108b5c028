//! Worker launcher backed by tokio tasks

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use shared::WorkerMessage;
use worker::{spawn_worker, EventGenerator, WorkerAssignment, WorkerConfig, WorkerHandle};

use crate::error::{ManagerError, ManagerResult};
use crate::traits::WorkerLauncher;

/// Launches each worker as a task on the current runtime
///
/// With a seeded config every launch gets its own derived seed so repeated
/// activations do not replay the same event stream.
#[derive(Debug)]
pub struct TokioWorkerLauncher {
    config: WorkerConfig,
    launches: AtomicU64,
}

impl TokioWorkerLauncher {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            launches: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Number of launch attempts so far
    pub fn launches(&self) -> u64 {
        self.launches.load(Ordering::Relaxed)
    }

    fn generator(&self, launch: u64) -> EventGenerator {
        match self.config.seed {
            Some(seed) => EventGenerator::seeded(seed.wrapping_add(launch)),
            None => EventGenerator::from_entropy(),
        }
    }
}

impl Default for TokioWorkerLauncher {
    fn default() -> Self {
        Self::new(WorkerConfig::default())
    }
}

impl WorkerLauncher for TokioWorkerLauncher {
    fn launch(
        &self,
        assignment: WorkerAssignment,
        outbound: mpsc::Sender<WorkerMessage>,
    ) -> ManagerResult<WorkerHandle> {
        let launch = self.launches.fetch_add(1, Ordering::Relaxed);
        let mut config = self.config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(launch));

        spawn_worker(assignment, config, self.generator(launch), outbound).map_err(|error| {
            ManagerError::SpawnFailed {
                device_id: assignment.device_id,
                reason: error.to_string(),
            }
        })
    }
}
