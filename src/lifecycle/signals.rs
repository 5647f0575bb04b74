//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGTERM and SIGINT
//! - SIGTERM triggers graceful shutdown
//! - SIGINT is swallowed so an interactive interrupt cannot cut a cycle short
//!
//! # Design Decisions
//! - Handlers are installed before any work starts; failing to install is fatal
//! - Handlers only flip the shutdown flag; the reconciler decides when to stop

use crate::lifecycle::Shutdown;

/// Installed signal streams, ready to be listened on.
#[cfg(unix)]
pub struct Signals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    /// Register SIGTERM and SIGINT handlers.
    ///
    /// Once this returns, SIGINT no longer terminates the process.
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait until SIGTERM arrives, then trigger `shutdown`.
    pub async fn listen(mut self, shutdown: Shutdown) {
        loop {
            tokio::select! {
                _ = self.terminate.recv() => {
                    tracing::info!("SIGTERM received, finishing current cycle before exit");
                    shutdown.trigger();
                    return;
                }
                _ = self.interrupt.recv() => {
                    tracing::info!("SIGINT ignored, send SIGTERM to stop");
                }
            }
        }
    }
}

/// Non-unix fallback: Ctrl-C is the only termination signal available.
#[cfg(not(unix))]
pub struct Signals;

#[cfg(not(unix))]
impl Signals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    pub async fn listen(self, shutdown: Shutdown) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Ctrl-C received, finishing current cycle before exit"),
            Err(e) => tracing::error!(error = %e, "Ctrl-C handler failed, shutting down"),
        }
        shutdown.trigger();
    }
}
