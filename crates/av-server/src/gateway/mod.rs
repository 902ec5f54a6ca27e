//! HTTP gateway
//!
//! Routing, in order:
//! - OPTIONS on any path is answered with CORS headers before routing
//! - `/api/ping`, `/api/info`, `/api/auth` and `/api/logout` are public
//! - every other `/api/*` path requires a valid session cookie
//! - everything else is served from the static directory

pub mod cookie;
mod error;
mod handlers;
mod middleware;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::ServerState;

/// Build the full router for `state`
pub fn router(state: Arc<ServerState>) -> Router {
    let protected = Router::new()
        .route("/apps", get(handlers::list_apps))
        .route("/launch/:id", post(handlers::launch_app))
        .route("/process-statuses", get(handlers::process_statuses))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::require_session,
        ));

    let api = Router::new()
        .route("/ping", get(handlers::ping))
        .route("/info", get(handlers::info))
        .route("/auth", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .merge(protected)
        .layer(axum::middleware::from_fn(middleware::api_headers));

    let static_dir = state.config.static_dir();
    tracing::debug!("Serving static files from {:?}", static_dir);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(axum::middleware::from_fn(middleware::preflight))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server bound to the shared state
pub struct Gateway {
    state: Arc<ServerState>,
    cancel: CancellationToken,
}

impl Gateway {
    pub fn new(state: Arc<ServerState>, cancel: CancellationToken) -> Self {
        Self { state, cancel }
    }

    /// Bind `bind_addr` and serve until cancelled
    pub async fn run(&self, bind_addr: &str) -> Result<()> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", bind_addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until cancelled
    ///
    /// After cancellation no new connections are accepted and in-flight
    /// requests get the configured grace period before being dropped.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Gateway listening on http://{}", local_addr);

        let app = router(Arc::clone(&self.state));
        let shutdown = self.cancel.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        });

        tokio::select! {
            result = &mut server => return flatten(result),
            _ = self.cancel.cancelled() => {
                tracing::info!("Gateway shutting down");
            }
        }

        let grace: Duration = self.state.config.shutdown_grace;
        match tokio::time::timeout(grace, &mut server).await {
            Ok(result) => flatten(result),
            Err(_) => {
                tracing::warn!("In-flight requests still running after {:?}, closing", grace);
                server.abort();
                Ok(())
            }
        }
    }
}

fn flatten(
    result: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    result
        .context("Gateway task failed")?
        .context("Gateway server error")
}
