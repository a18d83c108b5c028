//! Main webserver implementation
//!
//! Builds the axum router over [`AppState`] and serves it until a shutdown
//! signal arrives.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::{component_info, ComponentId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;
use crate::web::handlers::api;

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(api::health))
        // Device routes
        .route("/api/devices", post(api::create_device).get(api::list_devices))
        .route("/api/devices/:id", get(api::get_device))
        .route("/api/devices/:id/activate", post(api::activate_device))
        .route("/api/devices/:id/deactivate", post(api::deactivate_device))
        .route("/api/devices/:id/history", get(api::device_history))
        // Transaction log
        .route("/api/transactions", get(api::list_transactions))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// HTTP server with an external shutdown channel
pub struct WebServer {
    state: AppState,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            state,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Get shutdown sender for external shutdown requests
    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Serve until the shutdown channel fires
    pub async fn run(self, addr: SocketAddr) -> WebServerResult<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {addr}: {e}")))?;

        let local_addr = listener.local_addr()?;
        component_info!(ComponentId::current(), "🌐 Listening on http://{}", local_addr);

        let router = build_router(self.state);
        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
