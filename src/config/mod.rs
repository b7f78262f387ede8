//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to admission, session store, and pipeline
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no ambient global state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{CsrfConfig, ListenerConfig, ObservabilityConfig, ServerConfig, SessionConfig};
