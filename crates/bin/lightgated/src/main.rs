//! # lightgated — lightgate daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Open the hub connection (one handle, shared by every request)
//! - Construct the node bus, control/query nodes and application services
//! - Optionally feed JSON events from stdin to the configured node and write
//!   its outputs to stdout, one JSON object per line
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

use lightgate_adapter_http_axum::state::AppState;
use lightgate_adapter_virtual::VirtualHub;
use lightgate_app::node_bus::NodeBus;
use lightgate_app::nodes::{ControlNode, ControlNodeConfig, QueryNode};
use lightgate_app::services::pairing_service::PairingService;
use lightgate_app::services::query_service::QueryService;
use lightgate_domain::event::{InboundEvent, OutboundEvent};

use crate::config::{Config, NodeRole};

const VIRTUAL_HUB_ADDRESS: &str = "virtual";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Hub
    if config.hub.address != VIRTUAL_HUB_ADDRESS {
        tracing::warn!(
            address = %config.hub.address,
            "no wire client for this hub address, serving the simulated hub"
        );
    }
    let hub = Arc::new(VirtualHub::new(&config.hub.virtual_hub));

    // Node bus
    let bus = NodeBus::new(256);
    tokio::spawn(log_errors(bus.subscribe_errors()));
    tokio::spawn(write_outputs(bus.subscribe_outputs()));

    // Nodes
    let control = Arc::new(ControlNode::new(
        ControlNodeConfig {
            target: config.node_target(),
            send_output: config.node.send_output,
        },
        Arc::clone(&hub),
        bus.clone(),
    ));

    if config.node.stdin {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(read_events(tx));
        match config.node.role {
            NodeRole::Control => {
                tokio::spawn(Arc::clone(&control).run(rx));
            }
            NodeRole::Query => {
                let node = Arc::new(QueryNode::new(
                    config.node_target(),
                    Arc::clone(&hub),
                    bus.clone(),
                ));
                tokio::spawn(node.run(rx));
            }
        }
        tracing::info!(role = ?config.node.role, "reading events from stdin");
    }

    // HTTP
    let state = AppState::from_arcs(
        control,
        Arc::new(QueryService::new(Arc::clone(&hub))),
        Arc::new(PairingService::new(hub)),
    );
    let app = lightgate_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "lightgated listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lightgated stopped");
    Ok(())
}

/// Forward stdin lines to the node, skipping blank lines and malformed JSON.
async fn read_events(events: mpsc::Sender<InboundEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match serde_json::from_str(&line) {
                Ok(event) => {
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                Err(err) => tracing::warn!(error = %err, "ignoring malformed event"),
            },
            Ok(None) => break,
            Err(err) => {
                tracing::error!(error = %err, "failed to read stdin");
                break;
            }
        }
    }
    tracing::debug!("stdin closed");
}

async fn write_outputs(mut outputs: broadcast::Receiver<OutboundEvent>) {
    let mut stdout = tokio::io::stdout();
    loop {
        let event = match outputs.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "output writer lagging behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let mut line = match serde_json::to_vec(&event) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode output");
                continue;
            }
        };
        line.push(b'\n');
        if let Err(err) = stdout.write_all(&line).await {
            tracing::error!(error = %err, "failed to write output");
            break;
        }
        let _ = stdout.flush().await;
    }
}

async fn log_errors(mut errors: broadcast::Receiver<String>) {
    loop {
        match errors.recv().await {
            Ok(message) => tracing::error!(%message, "node error"),
            Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "error log lagging behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
