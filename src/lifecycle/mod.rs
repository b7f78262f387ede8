//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → stop accept cycles → sweeper stops → run() returns
//!
//! Signals (signals.rs):
//!     SIGINT/Ctrl+C → trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
