//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::Method;
use tokio::net::TcpListener;

use session_server::http::params::Params;
use session_server::{
    DispatchError, Dispatcher, Hooks, HttpServer, ResponseDescriptor, ServerConfig, Session,
    Shutdown,
};

/// Closure-backed dispatcher for driving the pipeline from tests.
pub struct FnDispatcher(
    Box<
        dyn Fn(&Session, &Method, &str, &Params) -> Result<ResponseDescriptor, DispatchError>
            + Send
            + Sync,
    >,
);

impl FnDispatcher {
    pub fn new(
        route: impl Fn(&Session, &Method, &str, &Params) -> Result<ResponseDescriptor, DispatchError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self(Box::new(route)))
    }
}

impl Dispatcher for FnDispatcher {
    fn route(
        &self,
        session: &Session,
        method: &Method,
        path: &str,
        params: &Params,
    ) -> Result<ResponseDescriptor, DispatchError> {
        (self.0)(session, method, path, params)
    }
}

/// Start a server on an ephemeral port with `/error/{kind}` redirects.
///
/// Returns the bound address and the shutdown handle; tests trigger it when
/// done.
#[allow(dead_code)]
pub async fn start_server(
    config: ServerConfig,
    dispatcher: Arc<dyn Dispatcher>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let hooks = Hooks::new(|kind| format!("/error/{kind}"), &config.csrf);
    let server = HttpServer::new(config, dispatcher, hooks);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(vec![listener], rx).await;
    });

    (addr, shutdown)
}
