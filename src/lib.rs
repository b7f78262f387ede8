//! Embeddable HTTP Server Core
//!
//! The runtime substrate a small web application is built on: a
//! bounded-concurrency accept cycle, per-client sessions with expiration
//! tracking, request decomposition into a merged parameter map, dispatch to
//! an application-supplied [`Dispatcher`], error-to-redirect translation,
//! and a post-process hook rewriting outgoing markup (CSRF token injection
//! by default).
//!
//! # Architecture Overview
//!
//! ```text
//!  Client Request               ┌─────────────────────────────────────────┐
//!  ────────────────────────────▶│    net     │    http     │   session    │
//!                               │ admission ─▶  pipeline  ─▶   store      │
//!                               │ + listener │             │  (dashmap)   │
//!                               └──────┬──────────────────────────────────┘
//!                                      │ (session, verb, path, params)
//!                                      ▼
//!                               ┌────────────┐
//!  Client Response ◀────────────│ Dispatcher │  redirect-or-content
//!   (writer + post-process)     │ (external) │  descriptor
//!                               └────────────┘
//! ```
//!
//! Routing, templating, and static file resolution live behind the
//! [`Dispatcher`] seam; this crate only owns the connection/session/dispatch
//! loop.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod http;
pub mod net;
pub mod session;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use dispatch::{DispatchError, Dispatcher, Hooks};
pub use http::response::{ErrorKind, ResponseDescriptor};
pub use http::server::HttpServer;
pub use lifecycle::Shutdown;
pub use session::{Session, SessionStore};
