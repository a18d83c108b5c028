//! HTTP front door for the device activity simulator
//!
//! Exposes device registration, activation control, status history and the
//! transaction log over a JSON API backed by the in-memory process manager.

pub mod cli;
pub mod error;
pub mod state;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use cli::Args;
pub use error::{WebServerError, WebServerResult};
pub use state::AppState;
pub use webserver_impl::{build_router, WebServer};
