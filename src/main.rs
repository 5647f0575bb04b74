//! Endpoint Reachability Reconciler (ProbeEP)
//!
//! A sidecar controller that keeps a Service's Endpoints in line with raw
//! TCP reachability of its member addresses.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────────┐
//!                 │                        PROBE-EP                          │
//!                 │                                                          │
//!   Kubernetes    │  ┌──────────┐   ┌────────────┐   ┌──────────────────┐   │
//!   API server ◀──┼──│ cluster  │◀──│ reconcile  │──▶│ health (probes)  │───┼──▶ member
//!   (Endpoints)   │  │  store   │   │   loop     │   │ one task per ip  │   │    addresses
//!                 │  └──────────┘   └─────┬──────┘   └──────────────────┘   │
//!                 │                       │                                  │
//!                 │                       ▼                                  │
//!                 │                ┌─────────────┐                           │
//!                 │                │ endpoints   │  classify / diff / move   │
//!                 │                └─────────────┘                           │
//!                 │                                                          │
//!                 │  ┌─────────┐ ┌────────────┐ ┌────────────┐ ┌──────────┐  │
//!                 │  │ config  │ │ resilience │ │ lifecycle  │ │ http     │  │
//!                 │  │         │ │ retry/back │ │ signals    │ │ /healthz │  │
//!                 │  └─────────┘ └────────────┘ └────────────┘ └──────────┘  │
//!                 └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use probe_ep::config::{load_config, ObservabilityConfig};
use probe_ep::lifecycle::startup;
use probe_ep::observability::logging;

#[derive(Parser)]
#[command(name = "probe-ep")]
#[command(
    about = "Moves Endpoints addresses between ready and not-ready by TCP reachability",
    long_about = None
)]
struct Cli {
    /// Optional TOML file; CHECK_* and PERIOD_SECONDS environment variables override it.
    #[arg(short, long, env = "PROBE_EP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability);

    tracing::info!(
        namespace = %config.target.namespace,
        endpoint = %config.target.endpoint,
        port = config.target.port,
        period_secs = config.period_secs,
        connect_timeout_ms = config.probe.connect_timeout_ms,
        conflict_policy = ?config.retry.conflict_policy,
        liveness_address = %config.liveness.bind_address,
        "Configuration loaded"
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Fatal error, exiting");
        return Err(e.into());
    }

    tracing::info!("Interrupted, shutdown complete");
    Ok(())
}
