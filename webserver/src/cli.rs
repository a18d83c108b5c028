//! Command line arguments for the webserver binary

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use manager::ManagerConfig;
use worker::WorkerConfig;

use crate::error::{WebServerError, WebServerResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "webserver")]
#[command(about = "Device activity simulator HTTP server")]
pub struct Args {
    /// Port for the HTTP API
    #[arg(long, env = "MDMS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "MDMS_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MDMS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Shortest wait between worker events
    #[arg(long, env = "MDMS_MIN_INTERVAL_MS", default_value_t = 1000)]
    pub min_interval_ms: u64,

    /// Longest wait between worker events
    #[arg(long, env = "MDMS_MAX_INTERVAL_MS", default_value_t = 4000)]
    pub max_interval_ms: u64,

    /// Heartbeat age after which a process is no longer live
    #[arg(long, env = "MDMS_LIVENESS_WINDOW_SECS", default_value_t = 10)]
    pub liveness_window_secs: u64,

    /// How often stale processes are reconciled
    #[arg(long, env = "MDMS_RECONCILE_INTERVAL_SECS", default_value_t = 5)]
    pub reconcile_interval_secs: u64,

    /// Seed for reproducible event streams
    #[arg(long, env = "MDMS_SEED")]
    pub seed: Option<u64>,

    /// Register one device of each category at startup
    #[arg(long, env = "MDMS_SEED_DEMO", default_value_t = false)]
    pub seed_demo: bool,
}

impl Args {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Manager settings derived from the arguments, validated
    pub fn manager_config(&self) -> WebServerResult<ManagerConfig> {
        let worker = WorkerConfig::new()
            .with_interval(
                Duration::from_millis(self.min_interval_ms),
                Duration::from_millis(self.max_interval_ms),
            )
            .with_seed(self.seed);

        let config = ManagerConfig::new()
            .with_liveness_window(Duration::from_secs(self.liveness_window_secs))
            .with_reconcile_interval(Duration::from_secs(self.reconcile_interval_secs))
            .with_worker(worker);

        config
            .validate()
            .map_err(|e| WebServerError::ConfigError(e.to_string()))?;
        Ok(config)
    }
}
