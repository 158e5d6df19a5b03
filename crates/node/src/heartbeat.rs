//! Fixed-cadence beacon sent to the coordinator's datagram endpoint.

use std::net::SocketAddr;
use std::time::Duration;

use corelib::{NodeId, Record};
use tokio::net::UdpSocket;
use tokio::sync::watch;

/// Beacon cadence: one datagram every 5 seconds.
pub const BEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Sends a `heartbeat` datagram to `coordinator` every [`BEAT_INTERVAL`]
/// until `shutdown` fires. Loss is tolerated: a send error is logged and
/// swallowed, never retried out of band (the next tick will try again).
pub async fn run(identity: NodeId, coordinator: SocketAddr, mut shutdown: watch::Receiver<bool>) -> std::io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    let payload = Record::heartbeat(identity.as_str().to_string()).to_line();
    let mut ticker = tokio::time::interval(BEAT_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = socket.send_to(payload.as_bytes(), coordinator).await {
                    tracing::warn!(error = %e, "heartbeat send failed, will retry next tick");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("heartbeat sender shutting down");
                    return Ok(());
                }
            }
        }
    }
}
