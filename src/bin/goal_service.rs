//! Health goal service entry point.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use health_goals::config::ServiceConfig;
use health_goals::goals::{create_router, GoalStore};
use health_goals::metrics;
use health_goals::utils::{init_tracing, shutdown_signal};

/// In-memory health goal CRUD service.
#[derive(Parser, Debug)]
#[command(name = "goal-service")]
#[command(about = "CRUD service for health goals, backed by memory")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServiceConfig::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    init_tracing(args.verbose, &config.rust_log);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let prometheus = metrics::install_prometheus().map_err(|e| {
        error!("Failed to install metrics recorder: {}", e);
        e
    })?;

    let router = create_router(GoalStore::new()).merge(metrics::metrics_router(prometheus));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Goal service stopped");
    Ok(())
}
