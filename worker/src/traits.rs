//! Worker trait definitions for dependency injection

use shared::DeviceCategory;

use crate::core::GeneratedEvent;
use crate::error::WorkerResult;

/// Source of synthetic events for a worker loop
///
/// `EventGenerator` is the production implementation; tests inject mocks to
/// drive the fault path.
#[mockall::automock]
pub trait EventSource: Send {
    /// Produce the next event for a device of the given category
    fn next_event(&mut self, category: DeviceCategory) -> WorkerResult<GeneratedEvent>;
}
