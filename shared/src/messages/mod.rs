//! Message types exchanged between workers and the lifecycle manager
//!
//! Workers own nothing persistent: everything they produce travels over the
//! manager's ingestion channel as a `WorkerMessage`.

pub mod worker;

pub use worker::{WorkerExit, WorkerMessage};
