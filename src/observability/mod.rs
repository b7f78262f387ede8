//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request counters/histograms, session gauge)
//!
//! Consumers:
//!     → stdout (tracing fmt layer, env-filterable)
//!     → Prometheus scrape endpoint (optional, config-gated)
//! ```

pub mod logging;
pub mod metrics;
