//! Worker → manager ingestion messages

use serde::{Deserialize, Serialize};

use crate::types::{DeviceId, ProcessId, TransactionEvent};

/// Everything a running worker reports to the manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// One synthetic event, to be persisted and counted as a heartbeat
    Event {
        process_id: ProcessId,
        event: TransactionEvent,
    },
    /// Unrecoverable error inside the worker loop; an `Exited` follows
    Fault {
        device_id: DeviceId,
        process_id: ProcessId,
        error: String,
    },
    /// Worker task finished, cleanly or not
    Exited(WorkerExit),
}

impl WorkerMessage {
    pub fn process_id(&self) -> ProcessId {
        match self {
            WorkerMessage::Event { process_id, .. } => *process_id,
            WorkerMessage::Fault { process_id, .. } => *process_id,
            WorkerMessage::Exited(exit) => exit.process_id,
        }
    }
}

/// Termination report for one worker invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerExit {
    pub device_id: DeviceId,
    pub process_id: ProcessId,
    pub events_emitted: u64,
    pub faulted: bool,
}
