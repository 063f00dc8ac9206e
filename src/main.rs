//! blm-adapter
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ listener ─▶ request id ─▶ trace ─▶ auth ──┐ │
//!                              │  (axum-server)                   │         │ │
//!                              │                          error envelope    ▼ │
//!     ◀────────────────────────┼──────────────────────────(200)─────  REST / │
//!                              │                                    plugins  │
//!                              │                                              │
//!     SIGINT / SIGTERM ────────┼─▶ Shutdown ─▶ orchestrator                  │
//!                              │      ├─ drain listener (drain_timeout)      │
//!                              │      ├─ stop REST + plugins                 │
//!                              │      └─ ceiling (stop_timeout) ─▶ exit      │
//!                              └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use blm_adapter::admin::{setup_admin_router, AdminState};
use blm_adapter::auth::CredentialCodec;
use blm_adapter::config::{load_config, AdapterConfig};
use blm_adapter::http::HttpServer;
use blm_adapter::lifecycle::{
    signals, start_components, Component, Shutdown, ShutdownOrchestrator, ShutdownState,
};
use blm_adapter::observability::{logging, metrics};
use blm_adapter::plugin::PluginSet;
use blm_adapter::rest::RestLayer;

#[derive(Parser)]
#[command(name = "blm-adapter", version, about = "HTTP adapter with Basic/Taosd authentication")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AdapterConfig::default(),
    };

    let mut log_config = config.log.clone();
    if config.debug && log_config.level == "info" {
        log_config.level = "debug".to_string();
    }
    let log_level = logging::init_logging(&log_config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "blm-adapter starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.enabled,
        drain_timeout_secs = config.shutdown.drain_timeout_secs,
        stop_timeout_secs = config.shutdown.stop_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let codec = Arc::new(CredentialCodec::default());
    let plugins = PluginSet::new();
    tracing::info!(plugins = ?plugins.names().collect::<Vec<_>>(), "Plugins registered");
    let components: Vec<Arc<dyn Component>> =
        vec![Arc::new(RestLayer::new(codec.clone())), Arc::new(plugins)];

    let admin = setup_admin_router(AdminState {
        codec,
        log_level: Some(log_level),
    });
    let app = start_components(admin, &components).await?;

    let server = HttpServer::new(&config, app).start().await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let orchestrator = ShutdownOrchestrator::from_config(&config.shutdown);
    let outcome = orchestrator.run(shutdown.wait(), server, components).await;
    metrics::record_shutdown(outcome.as_str());

    if outcome == ShutdownState::TimedOut {
        // Teardown tasks past the ceiling are abandoned, not joined.
        std::process::exit(0);
    }

    Ok(())
}
