//! Device worker loop
//!
//! `Running → Stopping → Terminated`. The loop waits a random interval,
//! produces one event and ships it to the manager. A stop signal observed at
//! the top of the loop or during the wait ends the loop without emitting.

use chrono::Utc;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use shared::{component_debug, ComponentId, DeviceCategory, DeviceId, ProcessId, TransactionEvent, WorkerMessage};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::traits::EventSource;

/// Lifecycle state of a single worker invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    Idle,
    Running,
    Stopping,
    Terminated,
}

/// Identity of the device and process a worker is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    pub device_id: DeviceId,
    pub process_id: ProcessId,
    pub category: DeviceCategory,
}

/// A worker bound to one device id and one process record
pub struct DeviceWorker<S>
where
    S: EventSource,
{
    assignment: WorkerAssignment,
    config: WorkerConfig,
    source: S,
    rng: StdRng,
    outbound: mpsc::Sender<WorkerMessage>,
    stop_rx: watch::Receiver<bool>,
    state: WorkerState,
    events_emitted: u64,
}

impl<S> DeviceWorker<S>
where
    S: EventSource,
{
    pub fn new(
        assignment: WorkerAssignment,
        config: WorkerConfig,
        source: S,
        outbound: mpsc::Sender<WorkerMessage>,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        let rng = config.rng();
        Self {
            assignment,
            config,
            source,
            rng,
            outbound,
            stop_rx,
            state: WorkerState::Idle,
            events_emitted: 0,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    pub fn assignment(&self) -> &WorkerAssignment {
        &self.assignment
    }

    /// Run until stopped or faulted; returns the number of events emitted
    pub async fn run(&mut self) -> WorkerResult<u64> {
        self.transition(WorkerState::Running);
        let result = self.run_loop().await;
        self.transition(WorkerState::Terminated);
        result
    }

    async fn run_loop(&mut self) -> WorkerResult<u64> {
        loop {
            if self.stop_requested() {
                self.transition(WorkerState::Stopping);
                break;
            }

            let delay = self.config.sample_delay(&mut self.rng);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                // Any change (or the handle being dropped) means stop
                _ = self.stop_rx.changed() => {
                    self.transition(WorkerState::Stopping);
                    break;
                }
            }

            self.emit().await?;
        }

        Ok(self.events_emitted)
    }

    async fn emit(&mut self) -> WorkerResult<()> {
        let generated = self.source.next_event(self.assignment.category)?;
        let event = TransactionEvent {
            device_id: self.assignment.device_id,
            username: generated.username,
            event_type: generated.event_type,
            payload: generated.payload,
            timestamp: Utc::now(),
        };

        self.outbound
            .send(WorkerMessage::Event {
                process_id: self.assignment.process_id,
                event,
            })
            .await
            .map_err(|_| WorkerError::ChannelClosed)?;

        self.events_emitted += 1;
        Ok(())
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow() || self.stop_rx.has_changed().is_err()
    }

    fn transition(&mut self, next: WorkerState) {
        if self.state != next {
            component_debug!(
                ComponentId::current(),
                "worker {} for device {}: {:?} -> {:?}",
                self.assignment.process_id,
                self.assignment.device_id,
                self.state,
                next
            );
            self.state = next;
        }
    }
}
