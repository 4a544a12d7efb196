//! HTTP server setup for the demo application.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (Oink layer, tracing)
//! - Bind server to listener with graceful shutdown

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::middleware::OinkLayer;

/// Demo HTTP server instrumented by an [`OinkLayer`].
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(layer: OinkLayer) -> Self {
        Self {
            router: Self::build_router(layer),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(layer: OinkLayer) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/users/{id}", get(handlers::show_user))
            .route("/legacy/{controller}/{action}", get(handlers::legacy_action))
            .route("/api/v1/status", get(handlers::api_status))
            .layer(layer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
