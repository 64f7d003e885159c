//! Controller daemon entry point.
//!
//! - Loads TOML configuration
//! - Wires the dispatch core to an OpenFlow collaborator
//! - Runs the dispatch loop and the read-only status API concurrently
//! - Shuts down cleanly on SIGINT/SIGTERM

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::{mpsc, watch, Mutex};
use tracing_subscriber::EnvFilter;

use lattice_common::Config;
use lattice_controller::core::ControllerCore;
use lattice_controller::{dispatch, events::ControllerEvent, status_api};
use lattice_openflow::fake::FakeOpenFlow;

/// Lattice SDN controller.
#[derive(Parser, Debug)]
#[command(name = "lattice-controller", about = "Policy-driven OpenFlow path controller")]
struct Cli {
    /// Path to a TOML configuration file. Defaults used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address for the read-only HTTP status API.
    #[arg(long)]
    status_addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            lattice_common::ConfigInput::from_toml_str(&raw)?.resolve()?
        }
        None => Config::default(),
    };
    if let Some(addr) = cli.status_addr.clone() {
        config.status_api_addr = Some(addr);
    }

    tracing::info!(
        default_policy = %config.default_policy,
        stable_seconds = ?config.stable_seconds,
        "lattice-controller starting"
    );

    // The OF wire codec and the base switch/packet-in dispatch loop are out
    // of scope for this core; FakeOpenFlow stands in as the discovery
    // service and LLDP framing service until a real transport is plugged
    // in here.
    let collaborator: Arc<FakeOpenFlow> = Arc::new(FakeOpenFlow::default());
    let core = Arc::new(Mutex::new(ControllerCore::new(
        config.clone(),
        collaborator.clone(),
        collaborator.clone(),
    )));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_events_tx, events_rx) = mpsc::channel::<ControllerEvent>(256);

    let dispatch_core = core.clone();
    let dispatch_shutdown = shutdown_rx.clone();
    let dispatch_handle = tokio::spawn(async move {
        dispatch::run(dispatch_core, events_rx, dispatch_shutdown).await;
    });

    let status_handle = if let Some(addr) = config.status_api_addr.clone() {
        let app = status_api::router(core.clone());
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, "status API listening");
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "status API server exited");
            }
        }))
    } else {
        None
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);

    let _ = dispatch_handle.await;
    if let Some(handle) = status_handle {
        handle.abort();
    }

    Ok(())
}
