//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the cluster
//! - Start background tasks (signals, liveness, metrics)
//! - Run the reconciler until shutdown or a fatal error
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including signal handler and
//!   metrics exporter installation
//! - The liveness listener is bound before the first cycle so the process
//!   reports alive while probing

use tokio::net::TcpListener;

use crate::cluster::KubeEndpointStore;
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::health::TcpProber;
use crate::http::LivenessServer;
use crate::lifecycle::signals::Signals;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::reconcile::Reconciler;

/// Run the controller with a validated configuration.
pub async fn run(config: ProbeConfig) -> Result<()> {
    let shutdown = Shutdown::new();

    let signals = Signals::install()?;
    tokio::spawn(signals.listen(shutdown.clone()));

    if config.observability.metrics_enabled {
        metrics::init_metrics(&config.observability.metrics_address)?;
    }

    let listener = TcpListener::bind(config.liveness.bind_address.as_str()).await?;
    let liveness = LivenessServer::new(&config.liveness);
    let liveness_shutdown = shutdown.subscribe();
    let liveness_task = tokio::spawn(async move {
        if let Err(e) = liveness.run(listener, liveness_shutdown).await {
            tracing::error!(error = %e, "Liveness server failed");
        }
    });

    let store = KubeEndpointStore::try_default().await?;
    let prober = TcpProber::new(config.target.port, config.probe.connect_timeout());
    let reconciler = Reconciler::new(&config, store, prober);

    tracing::info!("Service ProbeEP started");
    let result = reconciler.run(shutdown.subscribe()).await;

    shutdown.trigger();
    let _ = liveness_task.await;

    result
}
