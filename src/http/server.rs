//! Liveness HTTP server.
//!
//! # Responsibilities
//! - Serve a single route answering "OK" so the process manager knows we are alive
//! - Stop accepting when shutdown is triggered
//!
//! # Design Decisions
//! - No other routes; metrics have their own listener
//! - The answer is fixed: liveness of the process, not of the probed service

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::LivenessConfig;
use crate::lifecycle::ShutdownSignal;

/// Fixed liveness response body.
pub const LIVENESS_BODY: &str = "OK";

async fn healthz() -> &'static str {
    LIVENESS_BODY
}

/// HTTP server for the liveness endpoint.
pub struct LivenessServer {
    router: Router,
}

impl LivenessServer {
    pub fn new(config: &LivenessConfig) -> Self {
        Self {
            router: Self::build_router(&config.path),
        }
    }

    /// Build the Axum router with its single route.
    pub fn build_router(path: &str) -> Router {
        Router::new()
            .route(path, get(healthz))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Liveness server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.triggered().await })
            .await?;

        tracing::info!("Liveness server stopped");
        Ok(())
    }
}
