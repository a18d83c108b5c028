//! Core building blocks with no collaborator dependencies
//!
//! Time source and the per-device lock table that scopes every
//! state-mutating manager operation.

pub mod clock;
pub mod locks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use locks::DeviceLocks;
