//! Spawning workers and controlling them from the manager side

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use shared::{component_debug, component_warn, ComponentId, DeviceId, ProcessId, WorkerExit, WorkerMessage};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::traits::EventSource;
use crate::worker::{DeviceWorker, WorkerAssignment};

/// Manager-side handle for one running worker
#[derive(Debug)]
pub struct WorkerHandle {
    device_id: DeviceId,
    process_id: ProcessId,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// Ask the worker to stop at its next loop boundary
    pub fn stop(&self) {
        // Fails only when the worker already finished
        let _ = self.stop_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker task to finish
    pub async fn join(self) -> WorkerResult<()> {
        self.task.await.map_err(WorkerError::from)
    }
}

/// Spawn a worker on the current tokio runtime
///
/// The spawned task reports a `Fault` when the loop ends with an error and
/// always finishes with an `Exited` message on `outbound`.
pub fn spawn_worker<S>(
    assignment: WorkerAssignment,
    config: WorkerConfig,
    source: S,
    outbound: mpsc::Sender<WorkerMessage>,
) -> WorkerResult<WorkerHandle>
where
    S: EventSource + 'static,
{
    config.validate()?;

    let runtime = tokio::runtime::Handle::try_current().map_err(|e| WorkerError::SpawnFailed {
        reason: e.to_string(),
    })?;

    if outbound.is_closed() {
        return Err(WorkerError::SpawnFailed {
            reason: "ingestion channel closed".to_string(),
        });
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    let reporter = outbound.clone();
    let mut worker = DeviceWorker::new(assignment, config, source, outbound, stop_rx);

    let task = runtime.spawn(async move {
        let result = worker.run().await;
        let faulted = result.is_err();

        if let Err(error) = result {
            component_warn!(
                ComponentId::current(),
                "⚠️ Worker {} for device {} faulted: {}",
                assignment.process_id,
                assignment.device_id,
                error
            );
            let _ = reporter
                .send(WorkerMessage::Fault {
                    device_id: assignment.device_id,
                    process_id: assignment.process_id,
                    error: error.to_string(),
                })
                .await;
        }

        let exit = WorkerExit {
            device_id: assignment.device_id,
            process_id: assignment.process_id,
            events_emitted: worker.events_emitted(),
            faulted,
        };
        if reporter.send(WorkerMessage::Exited(exit)).await.is_err() {
            component_debug!(
                ComponentId::current(),
                "Exit of worker {} not delivered: manager gone",
                assignment.process_id
            );
        }
    });

    component_debug!(
        ComponentId::current(),
        "🏭 Spawned worker {} for {} device {}",
        assignment.process_id,
        assignment.category,
        assignment.device_id
    );

    Ok(WorkerHandle {
        device_id: assignment.device_id,
        process_id: assignment.process_id,
        stop_tx,
        task,
    })
}
