//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server
//! core. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind addresses, admission ceiling).
    pub listener: ListenerConfig,

    /// Session bookkeeping settings.
    pub session: SessionConfig,

    /// Anti-forgery token substitution settings.
    pub csrf: CsrfConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Addresses to bind, one listener each (e.g., "127.0.0.1:8080").
    ///
    /// Stands in for per-interface discovery at startup: instead of the
    /// server enumerating local IPv4 interfaces itself, the operator lists
    /// one address per interface to expose, or "0.0.0.0:port" to cover them
    /// all. Each bound address is logged at startup.
    pub bind_addresses: Vec<String>,

    /// Public host/IP used when building redirect locations.
    ///
    /// Empty means "use the request's own host address".
    pub public_address: String,

    /// How many tasks may concurrently wait to accept the next connection.
    ///
    /// Permits are released the instant a connection is accepted, so this
    /// bounds concurrent accept-waiters, not in-flight request processing.
    pub max_pending_accepts: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addresses: vec!["127.0.0.1:8080".to_string()],
            public_address: String::new(),
            max_pending_accepts: 20,
        }
    }
}

/// Session bookkeeping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time in seconds after which a session counts as expired.
    pub expiration_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { expiration_secs: 60 }
    }
}

/// Anti-forgery token substitution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Placeholder token scanned for in outgoing HTML.
    pub placeholder: String,

    /// Name attribute of the injected hidden input field.
    pub field_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            placeholder: "<!--CSRF_TOKEN-->".to_string(),
            field_name: "csrf_token".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
