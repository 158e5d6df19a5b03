//! Data node entry point: registers with the coordinator, serves store
//! operations on its own listener, and beacons liveness until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cli::ClusterConfig;
use corelib::{NodeId, Record};
use node::store::Store;
use node::{handler, heartbeat};
use replication::sweep::HEARTBEAT_PORT;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

#[derive(Parser)]
#[command(about = "Data node process for the key-value cluster")]
struct Args {
    /// IP address this node listens on for coordinator-issued operations.
    ip: String,
    /// Port this node listens on for coordinator-issued operations.
    port: u16,
    /// Override path for the cluster discovery file.
    #[arg(long, default_value_os_t = ClusterConfig::default_path())]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let identity = NodeId::new(&args.ip, args.port);

    let coordinator = ClusterConfig::read(&args.config)?;
    register(&coordinator, &identity).await?;

    let listener = TcpListener::bind((args.ip.as_str(), args.port)).await?;
    tracing::info!(%identity, "node listening");

    let store = Arc::new(Store::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let coordinator_udp: SocketAddr = format!("{}:{}", coordinator.ip, HEARTBEAT_PORT).parse()?;
    let beacon_handle = tokio::spawn(heartbeat::run(identity.clone(), coordinator_udp, shutdown_rx.clone()));
    let accept_handle = tokio::spawn(handler::accept_loop(listener, store, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    let _ = accept_handle.await;
    beacon_handle.await??;

    Ok(())
}

/// Connects to the coordinator's stream endpoint and runs the
/// CONNECTED → AWAITING_ID → REGISTER handshake for this node's identity.
async fn register(coordinator: &ClusterConfig, identity: &NodeId) -> anyhow::Result<()> {
    let stream = TcpStream::connect((coordinator.ip.as_str(), coordinator.port)).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut line = String::new();
    reader.read_line(&mut line).await?; // ack(connected)

    write_half
        .write_all(Record::identify_node(identity.as_str().to_string()).to_line().as_bytes())
        .await?;
    write_half.flush().await?;

    line.clear();
    reader.read_line(&mut line).await?; // ack(registration_successful)
    tracing::info!(%identity, reply = line.trim(), "registered with coordinator");
    Ok(())
}
