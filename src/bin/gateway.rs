//! API gateway entry point.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use health_goals::config::GatewayConfig;
use health_goals::gateway::{create_router, GatewayState};
use health_goals::metrics;
use health_goals::utils::{init_tracing, shutdown_signal};

/// API gateway in front of the health goal service.
#[derive(Parser, Debug)]
#[command(name = "api-gateway")]
#[command(about = "Forwards /goals traffic to the health goal service")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Goal service base URL (overrides UPSTREAM_URL).
    #[arg(long)]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = GatewayConfig::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(upstream_url) = args.upstream_url {
        config.upstream_url = upstream_url;
    }

    init_tracing(args.verbose, &config.rust_log);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let state = GatewayState::new(&config)?;
    info!("Forwarding /goals to {}/resource", state.upstream_base());

    let prometheus = metrics::install_prometheus()?;
    let router = create_router(state).merge(metrics::metrics_router(prometheus));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("API Gateway running on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}
