//! Per-connection request handler.
//!
//! Accepts one stream connection, reads one request record, executes the
//! matching store operation, writes one reply record, then lets the
//! connection drop. The outer accept loop spawns one task per connection
//! (unbounded) and isolates panics so one bad connection never takes down
//! the listener.

use std::sync::Arc;

use corelib::{ack, Record, RecordType};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::Result;
use crate::store::{Outcome, Store};

/// Serves exactly one request off `stream` against `store`.
pub async fn handle_connection(stream: TcpStream, store: Arc<Store>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(crate::error::Error::ConnectionClosed);
    }

    let reply = match Record::from_line(&line) {
        Ok(request) => dispatch(&store, &request),
        Err(_) => Record::ack(ack::ERROR),
    };

    write_half.write_all(reply.to_line().as_bytes()).await?;
    write_half.flush().await?;
    Ok(())
}

fn dispatch(store: &Store, request: &Record) -> Record {
    let tag = request.table_tag();
    match request.record_type() {
        RecordType::Get => match store.get(tag, &request.key) {
            Some(value) => Record::data(value),
            None => Record::ack(ack::KEY_ERROR),
        },
        RecordType::Put => {
            store.put(tag, &request.key, &request.value);
            Record::ack(ack::PUT_SUCCESS)
        }
        RecordType::Update => match store.update(tag, &request.key, &request.value) {
            Outcome::Applied => Record::ack(ack::UPDATE_SUCCESS),
            Outcome::NotFound => Record::ack(ack::KEY_ERROR),
        },
        RecordType::Delete => match store.delete(tag, &request.key) {
            Outcome::Applied => Record::ack(ack::DELETE_SUCCESS),
            Outcome::NotFound => Record::ack(ack::KEY_ERROR),
        },
        _ => Record::ack(ack::UNKNOWN_REQUEST),
    }
}

/// Accepts connections on `listener` until `shutdown` fires, handing each
/// one to its own task. A panic or I/O error inside a connection's task is
/// logged and does not affect the listener or any other connection.
pub async fn accept_loop(
    listener: tokio::net::TcpListener,
    store: Arc<Store>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
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
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, store).await {
                        tracing::debug!(%peer, error = %e, "connection handler ended with error");
                    }
                });
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("node listener shutting down");
                    break;
                }
            }
        }
    }
}
