//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (admission capacity > 0, session TTL > 0)
//! - Check bind and metrics addresses parse as socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub enum ValidationError {
    /// No bind address configured.
    NoBindAddress,
    /// A bind address does not parse as host:port.
    InvalidBindAddress(String),
    /// Admission capacity must be positive.
    ZeroAdmissionCapacity,
    /// Session TTL must be positive.
    ZeroSessionTtl,
    /// CSRF placeholder is empty while substitution is the default policy.
    EmptyCsrfPlaceholder,
    /// Metrics address does not parse as host:port.
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoBindAddress => write!(f, "no bind address configured"),
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::ZeroAdmissionCapacity => {
                write!(f, "listener.max_pending_accepts must be positive")
            }
            ValidationError::ZeroSessionTtl => {
                write!(f, "session.expiration_secs must be positive")
            }
            ValidationError::EmptyCsrfPlaceholder => write!(f, "csrf.placeholder must not be empty"),
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "invalid metrics address: {}", addr)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_addresses.is_empty() {
        errors.push(ValidationError::NoBindAddress);
    }
    for addr in &config.listener.bind_addresses {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress(addr.clone()));
        }
    }
    if config.listener.max_pending_accepts == 0 {
        errors.push(ValidationError::ZeroAdmissionCapacity);
    }
    if config.session.expiration_secs == 0 {
        errors.push(ValidationError::ZeroSessionTtl);
    }
    if config.csrf.placeholder.is_empty() {
        errors.push(ValidationError::EmptyCsrfPlaceholder);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
