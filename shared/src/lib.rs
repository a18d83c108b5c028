//! Shared types for the device activity simulator
//!
//! Contains the domain records, identifiers and worker ↔ manager messages
//! used by more than one crate. Component-internal types stay in their
//! respective crates.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{WorkerExit, WorkerMessage};
