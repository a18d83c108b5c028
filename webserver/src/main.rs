//! Device activity simulator entry point
//!
//! Wires the in-memory process manager to the HTTP front door and runs both
//! until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use manager::{DeviceService, InMemoryProcessManager, SystemClock};
use shared::{component_info, logging, ComponentId, DeviceCategory};
use tokio::signal;

use webserver::{AppState, Args, WebServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenv::dotenv().ok();
    let args = Args::parse();

    ComponentId::init_webserver();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ComponentId::current(), "device activity simulator");

    let config = args.manager_config().context("invalid manager configuration")?;
    let manager = Arc::new(
        InMemoryProcessManager::in_memory(config, Arc::new(SystemClock)).context("failed to build process manager")?,
    );

    let manager_task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.run().await })
    };

    let devices = DeviceService::new(manager.clone());
    if args.seed_demo {
        seed_demo_devices(&devices).await?;
    }

    let webserver = WebServer::new(AppState::new(devices));

    // Set up graceful shutdown
    let shutdown_sender = webserver.get_shutdown_sender();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(ComponentId::current(), "Received Ctrl+C signal");
                let _ = shutdown_sender.send(()).await;
            }
            Err(err) => {
                logging::log_error(ComponentId::current(), "Signal handling", &err);
            }
        }
    });

    webserver
        .run(args.socket_addr())
        .await
        .context("HTTP server failed")?;

    // Workers go down after the front door stops taking requests
    let _ = manager.shutdown_sender().send(()).await;
    manager_task
        .await
        .context("process manager task panicked")?
        .context("process manager failed")?;

    logging::log_success(ComponentId::current(), "Simulator stopped gracefully");
    Ok(())
}

async fn seed_demo_devices(devices: &DeviceService) -> anyhow::Result<()> {
    let demo = [
        ("Main entrance", DeviceCategory::AccessController, "192.168.10.11"),
        ("Lobby camera", DeviceCategory::FaceReader, "192.168.10.12"),
        ("Car park gate", DeviceCategory::Anpr, "192.168.10.13"),
    ];

    for (name, category, ip) in demo {
        let request = manager::CreateDeviceRequest::new(name, category.as_str(), ip);
        let device = devices
            .create_device(request)
            .await
            .with_context(|| format!("failed to register demo device '{name}'"))?;
        component_info!(ComponentId::current(), "📟 Demo device {} ({})", device.id, device.category);
    }
    Ok(())
}
