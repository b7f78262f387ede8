//! Listener binding.
//!
//! # Responsibilities
//! - Bind one TCP listener per configured address
//! - Log every bound address at startup
//! - Surface bind failures as fatal startup errors

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener binding.
#[derive(Debug)]
pub enum BindError {
    /// An address in the config does not parse as host:port.
    Parse(String),
    /// Failed to bind to an address.
    Bind(SocketAddr, std::io::Error),
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::Parse(addr) => write!(f, "Invalid bind address: {}", addr),
            BindError::Bind(addr, e) => write!(f, "Failed to bind {}: {}", addr, e),
        }
    }
}

impl std::error::Error for BindError {}

/// Bind every configured address, logging each as it comes up.
///
/// Returns one listener per address; the server runs an accept cycle for
/// each. Any single failure aborts startup.
pub async fn bind_all(config: &ListenerConfig) -> Result<Vec<TcpListener>, BindError> {
    let mut listeners = Vec::with_capacity(config.bind_addresses.len());

    for raw in &config.bind_addresses {
        let addr: SocketAddr = raw.parse().map_err(|_| BindError::Parse(raw.clone()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BindError::Bind(addr, e))?;
        let local_addr = listener.local_addr().map_err(|e| BindError::Bind(addr, e))?;

        tracing::info!(
            address = %local_addr,
            max_pending_accepts = config.max_pending_accepts,
            "Listening on http://{}/",
            local_addr
        );
        listeners.push(listener);
    }

    Ok(listeners)
}
