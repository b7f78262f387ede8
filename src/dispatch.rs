//! The dispatcher seam and injected hooks.
//!
//! Routing is an external collaborator: the pipeline hands it
//! (session, verb, path, parameters) and gets back a [`ResponseDescriptor`]
//! or a [`DispatchError`], which the pipeline downgrades to the configured
//! server-error redirect. Dispatch is an ordinary `Result` branch, not
//! exception-style control flow.

use hyper::Method;
use thiserror::Error;

use crate::http::params::Params;
use crate::http::postprocess::{CsrfTokenInjector, PostProcess};
use crate::http::request::RequestContext;
use crate::http::response::{ErrorKind, ResponseDescriptor};
use crate::session::Session;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a dispatcher.
///
/// The client never sees the detail; it is logged at the pipeline boundary
/// and the response becomes the server-error redirect.
#[derive(Debug, Error)]
#[error("dispatch failed: {0}")]
pub struct DispatchError(#[from] pub BoxError);

impl DispatchError {
    /// Convenience constructor for message-only failures.
    pub fn message(msg: impl Into<String>) -> Self {
        Self(msg.into().into())
    }
}

/// External routing component consumed by the pipeline.
///
/// Synchronous by contract: the pipeline defines no suspension point during
/// dispatch, so request I/O stays synchronous relative to its handler task.
pub trait Dispatcher: Send + Sync {
    fn route(
        &self,
        session: &Session,
        method: &Method,
        path: &str,
        params: &Params,
    ) -> Result<ResponseDescriptor, DispatchError>;
}

/// Error-to-redirect mapping, keyed by error classification.
pub type ErrorRedirect = dyn Fn(ErrorKind) -> String + Send + Sync;

/// Best-effort request observation hook; failures are swallowed.
pub type RequestObserver = dyn Fn(&Session, &RequestContext) -> Result<(), BoxError> + Send + Sync;

/// Injected extension points, supplied once at server construction.
///
/// `on_error` is required; the observer is optional; the post-processor
/// defaults to [`CsrfTokenInjector`] unless replaced.
pub struct Hooks {
    on_error: Box<ErrorRedirect>,
    on_request: Option<Box<RequestObserver>>,
    post_process: Box<dyn PostProcess>,
}

impl Hooks {
    /// Build hooks with the required error-to-redirect mapping and the
    /// default CSRF post-processor for the given config.
    pub fn new(
        on_error: impl Fn(ErrorKind) -> String + Send + Sync + 'static,
        csrf: &crate::config::CsrfConfig,
    ) -> Self {
        Self {
            on_error: Box::new(on_error),
            on_request: None,
            post_process: Box::new(CsrfTokenInjector::from_config(csrf)),
        }
    }

    /// Install a request observation hook.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&Session, &RequestContext) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.on_request = Some(Box::new(observer));
        self
    }

    /// Replace the default post-processor.
    pub fn with_post_process(mut self, post_process: Box<dyn PostProcess>) -> Self {
        self.post_process = post_process;
        self
    }

    /// Resolve an error classification to its redirect path.
    pub(crate) fn error_redirect(&self, kind: ErrorKind) -> String {
        (self.on_error)(kind)
    }

    /// Invoke the observer; side-effect only, failures logged and swallowed.
    pub(crate) fn observe(&self, session: &Session, ctx: &RequestContext) {
        if let Some(observer) = &self.on_request {
            if let Err(e) = observer(session, ctx) {
                tracing::warn!(error = %e, "Request observer failed; ignored");
            }
        }
    }

    pub(crate) fn post_processor(&self) -> &dyn PostProcess {
        self.post_process.as_ref()
    }
}
