//! Heartbeat monitor: counts beacons per interval and removes silent nodes
//! from the ring.
//!
//! A datagram receiver increments a per-identity counter on every
//! `heartbeat` record it sees; a separate sweep timer inspects and resets
//! those counters on a slower cadence. Both share one
//! `parking_lot::Mutex<HashMap<NodeId, u64>>` so the sweep's read-remove-reset
//! pass and the receiver's increments never interleave into a lost update.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use corelib::{hash::ring_position, HashRing, NodeId, Record, RecordType};
use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::watch;

/// Fixed port the monitor listens on for beacons.
pub const HEARTBEAT_PORT: u16 = 3769;

/// Sweep cadence: a node silent for a full interval is declared failed.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Shared beacon counters, one entry per identity known to be alive.
#[derive(Default)]
pub struct BeaconCounters {
    counts: Mutex<HashMap<NodeId, u64>>,
}

impl BeaconCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, identity: NodeId) {
        *self.counts.lock().entry(identity).or_insert(0) += 1;
    }

    /// Performs one sweep pass against `ring`: any identity with a zero
    /// count is removed from the ring and forgotten; every surviving
    /// identity's counter is reset to zero. Runs under a single lock
    /// acquisition so no increment observed during the pass is lost.
    fn sweep(&self, ring: &HashRing) {
        let mut counts = self.counts.lock();
        let silent: Vec<NodeId> = counts
            .iter()
            .filter(|(_, &c)| c == 0)
            .map(|(id, _)| id.clone())
            .collect();

        for identity in &silent {
            tracing::warn!(%identity, "node missed heartbeat interval, removing from ring");
            ring.remove(ring_position(identity.as_str()));
            counts.remove(identity);
        }
        for count in counts.values_mut() {
            *count = 0;
        }
    }
}

/// Runs the datagram receiver: listens on [`HEARTBEAT_PORT`], incrementing
/// `counters` for every valid `heartbeat` record received, until `shutdown`
/// fires.
pub async fn run_receiver(
    counters: Arc<BeaconCounters>,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", HEARTBEAT_PORT)).await?;
    let mut buf = [0u8; 1024];

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                let (n, _peer) = received?;
                let line = String::from_utf8_lossy(&buf[..n]);
                match Record::from_line(&line) {
                    Ok(record) if record.record_type() == RecordType::Heartbeat => {
                        counters.record(NodeId::from(record.message.as_str()));
                    }
                    Ok(_) => tracing::debug!("ignoring non-heartbeat datagram"),
                    Err(e) => tracing::debug!(error = %e, "malformed heartbeat datagram"),
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("heartbeat receiver shutting down");
                    return Ok(());
                }
            }
        }
    }
}

/// Runs the sweep timer: every [`SWEEP_INTERVAL`], removes silent nodes from
/// `ring` and resets survivors' counters, until `shutdown` fires.
pub async fn run_sweep_timer(
    counters: Arc<BeaconCounters>,
    ring: Arc<HashRing>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                counters.sweep(&ring);
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("sweep timer shutting down");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_node_is_removed_on_sweep() {
        let ring = HashRing::new();
        let identity = NodeId::from("127.0.0.1:8081");
        ring.insert(ring_position(identity.as_str()), identity.clone());

        let counters = BeaconCounters::new();
        counters.record(identity.clone());
        // Simulate a missed interval: manually clear the count to zero.
        counters.counts.lock().insert(identity.clone(), 0);

        counters.sweep(&ring);
        assert!(ring.is_empty());
    }

    #[test]
    fn beaconing_node_survives_sweep_with_reset_counter() {
        let ring = HashRing::new();
        let identity = NodeId::from("127.0.0.1:8081");
        ring.insert(ring_position(identity.as_str()), identity.clone());

        let counters = BeaconCounters::new();
        counters.record(identity.clone());
        counters.record(identity.clone());

        counters.sweep(&ring);
        assert_eq!(ring.size(), 1);
        assert_eq!(*counters.counts.lock().get(&identity).unwrap(), 0);
    }
}
