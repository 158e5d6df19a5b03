//! Coordinator entry point: binds the stream listener, publishes the
//! cluster discovery file, and runs the accept loop until a shutdown
//! signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cli::ClusterConfig;
use replication::coordinator::{lifecycle, CoordinatorState};
use tokio::net::TcpListener;
use tokio::sync::watch;

#[derive(Parser)]
#[command(about = "Coordinator process for the key-value cluster")]
struct Args {
    /// IP address to bind the stream listener on.
    ip: String,
    /// Port to bind the stream listener on.
    port: u16,
    /// Override path for the cluster discovery file.
    #[arg(long, default_value_os_t = ClusterConfig::default_path())]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Args::parse();

    let listener = TcpListener::bind((args.ip.as_str(), args.port)).await?;
    tracing::info!(ip = %args.ip, port = args.port, "coordinator listening");

    ClusterConfig::new(args.ip, args.port).write(&args.config)?;

    let state = Arc::new(CoordinatorState::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let lifecycle_handle = tokio::spawn(lifecycle::run(listener, state, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    lifecycle_handle.await?;

    Ok(())
}
