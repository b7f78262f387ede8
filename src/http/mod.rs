//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (admission loop, per-connection serving)
//!     → request.rs (verb, path, merged query/body parameters)
//!     → params.rs (key=value&... decoding, ordered, last-wins)
//!     → [dispatcher produces a ResponseDescriptor]
//!     → postprocess.rs (HTML rewrite, CSRF token injection)
//!     → writer.rs (redirect or content onto the wire)
//! ```

pub mod params;
pub mod postprocess;
pub mod request;
pub mod response;
pub mod server;
pub mod writer;

pub use params::Params;
pub use postprocess::{CsrfTokenInjector, PostProcess};
pub use request::RequestContext;
pub use response::{ErrorKind, ResponseDescriptor};
pub use server::HttpServer;
