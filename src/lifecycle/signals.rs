//! OS signal handling.
//!
//! Translates Ctrl+C into the internal shutdown signal using Tokio's
//! async-safe signal support.

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Spawn a task that triggers shutdown on the first interrupt.
pub fn trigger_on_interrupt(shutdown: &Shutdown) -> JoinHandle<()> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install interrupt handler");
            return;
        }
        tracing::info!("Interrupt received; shutting down");
        shutdown.trigger();
    })
}
