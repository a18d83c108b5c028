//! Service implementations
//!
//! In-memory implementations of the collaborator traits plus the tokio-backed
//! worker launcher. State lives behind async locks so the services can be
//! shared between the manager run loop and request handlers.

pub mod catalog;
pub mod history;
pub mod launcher;
pub mod registry;
pub mod sink;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use catalog::InMemoryDeviceCatalog;
pub use history::InMemoryStatusHistory;
pub use launcher::TokioWorkerLauncher;
pub use registry::InMemoryProcessRegistry;
pub use sink::InMemoryTransactionSink;
