//! Session management subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted request (client IP)
//!     → store.rs resolve: lookup-or-create, atomic per key
//!     → dispatch observes the session's pre-request state
//!     → store.rs touch after dispatch refreshes last-activity
//!
//! Background:
//!     sweeper task removes sessions idle beyond the TTL
//! ```
//!
//! # Design Decisions
//! - Keyed by client IP: one live session per distinct client at a time
//! - Expiration is advisory to the dispatcher; the store never blocks a
//!   request itself
//! - The sweep destroys stale identities so they cannot silently
//!   re-authenticate

pub mod session;
pub mod store;

pub use session::Session;
pub use store::SessionStore;
