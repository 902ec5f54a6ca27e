//! Service lifecycle: state, monitor, discovery and gateway

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use av_core::config::ServerConfig;

use crate::discovery::{default_service_name, Advertiser, LogAdvertiser};
use crate::gateway::Gateway;
use crate::process::run_monitor;
use crate::state::ServerState;

/// Run the service with `config` until `cancel` fires
pub async fn run(config: ServerConfig, cancel: CancellationToken) -> Result<()> {
    let bind_addr = config.bind_address.clone();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    let advertiser = advertiser_for(&config);
    let state = Arc::new(
        ServerState::new(config).context("Failed to load registered apps")?,
    );

    serve(state, listener, advertiser, cancel).await
}

/// Run the service on a bound listener
///
/// The monitor and the advertiser live exactly as long as the gateway.
/// Launched apps are never touched on the way out.
pub async fn serve(
    state: Arc<ServerState>,
    listener: TcpListener,
    advertiser: Option<Box<dyn Advertiser>>,
    cancel: CancellationToken,
) -> Result<()> {
    let port = listener.local_addr()?.port();

    let monitor = tokio::spawn(run_monitor(
        Arc::clone(&state),
        state.config.scan_interval,
        cancel.clone(),
    ));

    if let Some(advertiser) = &advertiser {
        if let Err(e) = advertiser.start(port) {
            tracing::warn!("Failed to start discovery: {}", e);
        }
    }

    let gateway = Gateway::new(Arc::clone(&state), cancel.clone());
    let result = gateway.serve(listener).await;

    // The gateway may have stopped on its own; take the monitor down too
    cancel.cancel();
    if let Err(e) = monitor.await {
        tracing::error!("Process monitor panicked: {}", e);
    }

    if let Some(advertiser) = &advertiser {
        advertiser.stop();
    }

    tracing::info!("Service stopped");
    result
}

/// Cancel `cancel` on Ctrl+C or SIGTERM
pub fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel.cancel();
    });
}

fn advertiser_for(config: &ServerConfig) -> Option<Box<dyn Advertiser>> {
    if !config.discovery.enabled {
        return None;
    }
    let name = config
        .discovery
        .service_name
        .clone()
        .unwrap_or_else(default_service_name);
    Some(Box::new(LogAdvertiser::new(name)))
}
