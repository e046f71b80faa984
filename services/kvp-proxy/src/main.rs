//! WMTS KVP to RESTful proxy.
//!
//! Accepts legacy WMTS KVP requests and forwards them as RESTful requests to
//! the configured backend.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use kvp_proxy::config::ProxyConfig;
use kvp_proxy::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "kvp-proxy")]
#[command(about = "WMTS KVP to RESTful translating proxy")]
struct Args {
    /// Backend to proxy to, with protocol and port (e.g. http://localhost:8080)
    #[arg(long, default_value = "http://localhost", env = "KVP_PROXY_HOST")]
    host: String,

    /// Optional GetCapabilities template file; if not set the request is proxied
    #[arg(short, long, env = "KVP_PROXY_TEMPLATE")]
    template: Option<PathBuf>,

    /// Log every request
    #[arg(short = 'l', long, env = "KVP_PROXY_LOGGING")]
    logging: bool,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0:9001", env = "KVP_PROXY_LISTEN")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "KVP_PROXY_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = kvp_proxy::metrics::install_recorder()?;

    let config = ProxyConfig::new(&args.host, args.template, args.logging)?;
    info!(
        target_host = %config.target,
        template = ?config.template,
        logging = config.logging,
        "Starting WMTS KVP proxy"
    );

    let state = Arc::new(AppState::new(config, Some(prometheus_handle))?);
    let app = kvp_proxy::router(state);

    // Parse listen address
    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
