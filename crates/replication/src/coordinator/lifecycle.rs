//! Coordinator bootstrap, accept loop, and graceful shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{watch, Semaphore};

use super::{session, CoordinatorState, DEFAULT_SESSION_CONCURRENCY};
use crate::sweep::{self, BeaconCounters};

/// Runs the coordinator until `shutdown` fires: launches the heartbeat
/// receiver and sweep timer as background tasks, then accepts stream
/// connections and hands each to a worker drawn from a bounded semaphore
/// pool. On shutdown, stops accepting and waits for in-flight sessions to
/// finish.
pub async fn run(listener: TcpListener, state: Arc<CoordinatorState>, mut shutdown: watch::Receiver<bool>) {
    let counters = Arc::new(BeaconCounters::new());

    let receiver_task = tokio::spawn(sweep::run_receiver(Arc::clone(&counters), shutdown.clone()));
    let sweep_task = tokio::spawn(sweep::run_sweep_timer(
        Arc::clone(&counters),
        Arc::clone(&state.ring),
        shutdown.clone(),
    ));

    let permits = Arc::new(Semaphore::new(DEFAULT_SESSION_CONCURRENCY));
    let mut in_flight = Vec::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };
                let state = Arc::clone(&state);
                let permits = Arc::clone(&permits);
                let handle = tokio::spawn(async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return;
                    };
                    if let Err(e) = session::handle_connection(stream, state).await {
                        tracing::debug!(%peer, error = %e, "session ended with error");
                    }
                });
                in_flight.push(handle);
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("coordinator accept loop shutting down");
                    break;
                }
            }
        }
    }

    for handle in in_flight {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "session task ended with a panic");
        }
    }
    let _ = receiver_task.await;
    let _ = sweep_task.await;
}
