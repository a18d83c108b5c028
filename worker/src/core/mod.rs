//! Worker core business logic
//!
//! Pure event generation with no I/O; deterministic for a seeded RNG.

pub mod generator;

pub use generator::{EventGenerator, GeneratedEvent, GENERIC_EVENT_TYPE, USERS};
