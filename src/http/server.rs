//! HTTP server: admission loop and request pipeline.
//!
//! # Responsibilities
//! - Run one accept cycle per bound listener under the admission ceiling
//! - Serve each accepted connection on its own task
//! - Drive a request through parse → session → dispatch → respond
//! - Translate any pipeline failure into the server-error redirect
//!
//! # Admission semantics
//! A permit is taken before a task starts waiting on accept and dropped the
//! instant a connection arrives, so the configured capacity bounds
//! concurrent accept-waiters rather than total in-flight processing.
//! Request handling itself runs unbounded and fully independently.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::HOST;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};

use crate::config::ServerConfig;
use crate::dispatch::{BoxError, Dispatcher, Hooks};
use crate::http::request::RequestContext;
use crate::http::response::{ErrorKind, ResponseDescriptor};
use crate::http::writer;
use crate::net::ConnectionAdmission;
use crate::observability::metrics;
use crate::session::SessionStore;

/// Error type for the process-wide serve loop.
///
/// Accept failures are not recoverable locally; they terminate the loop and
/// surface to the operator.
#[derive(Debug)]
pub enum ServeError {
    Accept(std::io::Error),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ServeError {}

/// The one operation the admission cycle needs from a listener.
///
/// Seam for failure injection: production uses `TcpListener`, tests can
/// supply an acceptor that fails on demand.
trait Acceptor: Send + Sync + 'static {
    fn accept(&self) -> impl Future<Output = std::io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl Acceptor for TcpListener {
    async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Shared per-request state handed to every handler task.
#[derive(Clone)]
struct PipelineState {
    config: Arc<ServerConfig>,
    dispatcher: Arc<dyn Dispatcher>,
    hooks: Arc<Hooks>,
    sessions: Arc<SessionStore>,
}

/// The server core: admission pool, session store, and request pipeline
/// around an application-supplied dispatcher.
pub struct HttpServer {
    state: PipelineState,
    admission: ConnectionAdmission,
}

impl HttpServer {
    /// Assemble the server from validated configuration, the external
    /// dispatcher, and the injected hooks.
    pub fn new(config: ServerConfig, dispatcher: Arc<dyn Dispatcher>, hooks: Hooks) -> Self {
        let ttl = std::time::Duration::from_secs(config.session.expiration_secs);
        let admission = ConnectionAdmission::new(config.listener.max_pending_accepts);
        let state = PipelineState {
            config: Arc::new(config),
            dispatcher,
            hooks: Arc::new(hooks),
            sessions: Arc::new(SessionStore::new(ttl)),
        };
        Self { state, admission }
    }

    /// Shared handle to the session store (for embedders and tests).
    pub fn sessions(&self) -> Arc<SessionStore> {
        self.state.sessions.clone()
    }

    pub fn admission(&self) -> &ConnectionAdmission {
        &self.admission
    }

    /// Run the accept cycles until shutdown fires or a listener fails.
    ///
    /// Spawns the session sweeper and one admission loop per listener.
    /// Listener failures propagate to the caller; per-request failures never
    /// do.
    pub async fn run(
        self,
        listeners: Vec<TcpListener>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let listeners = listeners.into_iter().map(Arc::new).collect();
        self.run_cycles(listeners, shutdown).await
    }

    async fn run_cycles<A: Acceptor>(
        self,
        listeners: Vec<Arc<A>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let sweeper = self
            .state
            .sessions
            .clone()
            .spawn_sweeper(shutdown.resubscribe());

        let (fatal_tx, mut fatal_rx) = mpsc::channel::<std::io::Error>(1);
        let mut cycles = Vec::with_capacity(listeners.len());
        for listener in listeners {
            cycles.push(tokio::spawn(accept_cycle(
                listener,
                self.admission.clone(),
                self.state.clone(),
                fatal_tx.clone(),
                shutdown.resubscribe(),
            )));
        }
        drop(fatal_tx);

        let result = tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Shutdown signal received; stopping accept cycles");
                Ok(())
            }
            fatal = fatal_rx.recv() => match fatal {
                Some(e) => {
                    tracing::error!(error = %e, "Listener failed; terminating serve loop");
                    Err(ServeError::Accept(e))
                }
                None => Ok(()),
            },
        };

        for cycle in &cycles {
            cycle.abort();
        }
        sweeper.abort();
        result
    }
}

/// One listener's admission loop.
///
/// Each iteration blocks for a permit, then spawns an independent waiter
/// that holds the permit only while awaiting the next connection. Waiters
/// bail out on shutdown so the listener socket is released once the last
/// one returns.
async fn accept_cycle<A: Acceptor>(
    listener: Arc<A>,
    admission: ConnectionAdmission,
    state: PipelineState,
    fatal: mpsc::Sender<std::io::Error>,
    shutdown: broadcast::Receiver<()>,
) {
    loop {
        let permit = admission.acquire().await;
        let listener = listener.clone();
        let state = state.clone();
        let fatal = fatal.clone();
        let mut shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = shutdown.recv() => {
                    drop(permit);
                    return;
                }
            };
            // Release the instant a connection arrives, so the ceiling
            // bounds accept-waiters, not request processing.
            drop(permit);
            match accepted {
                Ok((stream, peer)) => handle_connection(stream, peer, state).await,
                Err(e) => {
                    let _ = fatal.send(e).await;
                }
            }
        });
    }
}

/// Serve one accepted connection; runs concurrently with any number of
/// others.
async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: PipelineState) {
    let local_addr = stream.local_addr().ok();
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let state = state.clone();
        async move { Ok::<_, Infallible>(handle_request(req, peer, local_addr, &state).await) }
    });

    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
    }
}

/// Drive one request through the pipeline.
///
/// Failures in parsing, session resolution, or dispatch are caught here and
/// degraded to the configured server-error redirect; the wire never carries
/// a raw error body.
async fn handle_request(
    req: Request<Incoming>,
    peer: SocketAddr,
    local_addr: Option<SocketAddr>,
    state: &PipelineState,
) -> Response<Full<Bytes>> {
    let start = Instant::now();
    let method = req.method().clone();

    let request_host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| local_addr.map(|addr| addr.to_string()))
        .unwrap_or_else(|| "localhost".to_string());

    let descriptor = match process(req, peer, state).await {
        Ok(descriptor) => descriptor,
        Err(e) => {
            tracing::error!(peer = %peer, error = %e, "Request failed; degrading to redirect");
            ResponseDescriptor::redirect(state.hooks.error_redirect(ErrorKind::ServerError))
        }
    };

    let response = writer::write_response(
        &descriptor,
        &request_host,
        &state.config.listener.public_address,
    );
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// The fallible stretch of the pipeline: parse → session → observe →
/// dispatch → error override → touch → post-process.
async fn process(
    req: Request<Incoming>,
    peer: SocketAddr,
    state: &PipelineState,
) -> Result<ResponseDescriptor, BoxError> {
    let ctx = RequestContext::from_hyper(req, peer).await?;
    let session = state.sessions.resolve(peer.ip());

    state.hooks.observe(&session, &ctx);

    let mut descriptor =
        state
            .dispatcher
            .route(&session, ctx.method(), ctx.path(), ctx.params())?;

    if descriptor.error_kind().is_error() {
        let target = state.hooks.error_redirect(descriptor.error_kind());
        tracing::debug!(
            kind = %descriptor.error_kind(),
            target = %target,
            "Dispatch signalled error; redirecting"
        );
        descriptor.redirect_to(target);
    }

    // After dispatch, so expiration checks during dispatch saw the
    // session's pre-request state.
    state.sessions.touch(&session);

    descriptor.rewrite_html(|html| state.hooks.post_processor().rewrite(&session, html));

    Ok(descriptor)
}
