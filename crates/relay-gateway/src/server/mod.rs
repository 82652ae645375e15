//! Relay server setup
//!
//! Provides the WebSocket endpoint, the administrative HTTP routes, and the
//! serve loop with graceful shutdown.

mod handler;
mod session_id;
mod state;

pub use handler::relay_handler;
pub use session_id::{generate_session_id, issue_session_id, SessionIdResponse};
pub use state::RelayState;

use crate::protocol::CloseCode;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use relay_common::{AppError, AppResult, CorsConfig, RelayConfig};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the relay router
pub fn create_router() -> Router<RelayState> {
    // Upgrade responses have no body to compress, so only plain HTTP routes get gzip
    let http_routes = Router::new()
        .route("/health", get(health_check))
        .route("/session", get(issue_session_id))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/ws", get(relay_handler))
        .merge(http_routes)
}

/// Health check endpoint (liveness probe)
///
/// GET /health
async fn health_check() -> &'static str {
    "OK"
}

/// Build the CORS layer. An empty allow list permits any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

/// Build the complete application
pub fn create_app(state: RelayState) -> Router {
    let cors = cors_layer(&state.config().cors);

    create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Run the relay server until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: &str, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Starting relay server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::bind(addr, e))?;

    let local_addr = listener.local_addr().map_err(AppError::internal)?;
    tracing::info!("Relay listening on ws://{}/ws", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    tracing::info!("Relay server stopped");

    Ok(())
}

/// Run the complete relay server with configuration
pub async fn run(config: RelayConfig) -> AppResult<()> {
    let addr = config.server.address();

    // Create relay state
    let state = RelayState::new(config);

    // Build application
    let app = create_app(state.clone());

    // Open sockets would otherwise hold the graceful shutdown forever
    let shutdown = async move {
        shutdown_signal().await;
        let closed = state.transport().close_all(CloseCode::ServerShutdown);
        tracing::info!(connections = closed, "Closed live connections");
    };

    // Run server
    run_server(app, &addr, shutdown).await
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
