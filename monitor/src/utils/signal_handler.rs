use std::fmt;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM - Docker/Kubernetes graceful shutdown
    Terminate,
    /// SIGINT - Ctrl+C interactive shutdown
    Interrupt,
    /// The token was cancelled by the application itself
    Internal,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Cancels `token` on the first shutdown signal and reports which one it was.
pub async fn cancel_on_shutdown(token: CancellationToken) -> ShutdownSignal {
    let signal = tokio::select! {
        signal = wait_for_signal() => signal,
        _ = token.cancelled() => ShutdownSignal::Internal,
    };
    info!("🛑 Received shutdown signal: {}", signal);
    token.cancel();
    signal
}

#[cfg(unix)]
async fn wait_for_signal() -> ShutdownSignal {
    let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Unix signal handlers unavailable, listening for Ctrl+C only");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => ShutdownSignal::Terminate,
        _ = sigint.recv() => ShutdownSignal::Interrupt,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> ShutdownSignal {
    ctrl_c().await
}

async fn ctrl_c() -> ShutdownSignal {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C handler unavailable, shutdown only on internal cancellation");
        std::future::pending::<()>().await;
    }
    ShutdownSignal::Interrupt
}
