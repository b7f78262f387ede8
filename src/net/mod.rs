//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → listener.rs (bind one TcpListener per configured address)
//!
//! Accept cycle (per listener)
//!     → admission.rs (acquire permit, bounding concurrent accept-waiters)
//!     → accept connection, release permit immediately
//!     → hand off to the HTTP pipeline
//! ```
//!
//! # Design Decisions
//! - Permits gate how many tasks wait on accept, not total in-flight work
//! - Permit release on drop, so a panicking waiter cannot leak capacity
//! - Bind failure at startup is fatal; the operator fixes the config

pub mod admission;
pub mod listener;

pub use admission::{AdmissionPermit, ConnectionAdmission};
pub use listener::{bind_all, BindError};
