//! session-server binary.
//!
//! Wires the server core to a tiny demo dispatcher so the crate runs
//! standalone; real applications embed the library and supply their own
//! [`Dispatcher`].

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hyper::Method;

use session_server::config::loader::load_config;
use session_server::http::params::Params;
use session_server::{
    DispatchError, Dispatcher, ErrorKind, Hooks, HttpServer, ResponseDescriptor, ServerConfig,
    Session, Shutdown,
};

#[derive(Parser)]
#[command(name = "session-server")]
#[command(about = "Embeddable HTTP server core with a demo dispatcher", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind addresses with a single one.
    #[arg(short, long)]
    bind: Option<String>,
}

/// Minimal routing for the standalone binary.
struct DemoDispatcher;

impl Dispatcher for DemoDispatcher {
    fn route(
        &self,
        _session: &Session,
        method: &Method,
        path: &str,
        params: &Params,
    ) -> Result<ResponseDescriptor, DispatchError> {
        match (method.as_str(), path) {
            ("GET", "/") => Ok(ResponseDescriptor::html(
                "<html><body>\
                 <form method=\"post\" action=\"/hello\">\
                 <!--CSRF_TOKEN-->\
                 <input name=\"name\"><button>Send</button>\
                 </form></body></html>",
            )),
            ("POST", "/hello") => {
                let name = params.get("name").map(String::as_str).unwrap_or("anonymous");
                Ok(ResponseDescriptor::html(format!(
                    "<html><body>Hello, {}!</body></html>",
                    name
                )))
            }
            _ => Ok(ResponseDescriptor::error(ErrorKind::PageNotFound)),
        }
    }
}

fn error_redirect(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::PageNotFound | ErrorKind::FileNotFound => "/".to_string(),
        _ => format!("/?error={}", kind),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_addresses = vec![bind];
    }

    session_server::observability::logging::init(&config.observability.log_level);
    tracing::info!("session-server v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => session_server::observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listeners = session_server::net::bind_all(&config.listener).await?;

    let hooks = Hooks::new(error_redirect, &config.csrf);
    let server = HttpServer::new(config, Arc::new(DemoDispatcher), hooks);

    let shutdown = Shutdown::new();
    session_server::lifecycle::signals::trigger_on_interrupt(&shutdown);

    server.run(listeners, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
