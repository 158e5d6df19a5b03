//! Per-connection session handler: the ACCEPTED → AWAITING_ID →
//! SERVING_CLIENT state machine, and the request/replication pipeline run
//! against each client request.

use std::sync::Arc;
use std::time::Duration;

use corelib::hash::ring_position;
use corelib::{ack, NodeId, Record, RecordType, TableTag};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::CoordinatorState;
use crate::error::Result;

/// Drives one accepted connection through identification and, for clients,
/// the request-serving loop.
pub async fn handle_connection(stream: TcpStream, state: Arc<CoordinatorState>) -> Result<()> {
    let peer = stream.peer_addr().ok();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half.write_all(Record::ack(ack::CONNECTED).to_line().as_bytes()).await?;
    write_half.flush().await?;

    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(());
    }
    let identification = match Record::from_line(&line) {
        Ok(record) => record,
        Err(_) => return Ok(()),
    };

    match identification.id.as_str() {
        "client" => {
            write_half.write_all(Record::ack(ack::READY_TO_SERVE).to_line().as_bytes()).await?;
            write_half.flush().await?;
            serve_client(&mut reader, &mut write_half, &state).await
        }
        "slave_server" => {
            let identity = if identification.message.is_empty() {
                peer.map(|p| p.to_string()).unwrap_or_default()
            } else {
                identification.message.clone()
            };
            let identity = NodeId::from(identity);
            state.ring.insert(ring_position(identity.as_str()), identity.clone());
            tracing::info!(%identity, "node registered");
            write_half
                .write_all(Record::ack(ack::REGISTRATION_SUCCESSFUL).to_line().as_bytes())
                .await?;
            write_half.flush().await?;
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn serve_client<R, W>(reader: &mut BufReader<R>, writer: &mut W, state: &CoordinatorState) -> Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let reply = match Record::from_line(&line) {
            Ok(request) => dispatch(state, &request).await,
            Err(_) => Record::ack(ack::PARSE_ERROR),
        };

        writer.write_all(reply.to_line().as_bytes()).await?;
        writer.flush().await?;
    }
}

async fn dispatch(state: &CoordinatorState, request: &Record) -> Record {
    match request.record_type() {
        RecordType::Get => handle_get(state, &request.key).await,
        RecordType::Put => handle_put(state, &request.key, &request.value).await,
        RecordType::Update => handle_update(state, &request.key, &request.value).await,
        RecordType::Delete => handle_delete(state, &request.key).await,
        _ => Record::ack(ack::UNKNOWN_REQUEST),
    }
}

async fn handle_get(state: &CoordinatorState, key: &str) -> Record {
    if let Some(value) = state.cache.get(key) {
        return Record::data(value);
    }

    let h = ring_position(key);
    let Some((_, primary)) = state.ring.successor(h) else {
        return Record::ack(ack::NO_SERVERS_AVAILABLE);
    };

    let request = Record::request(RecordType::Get, key, "", TableTag::Own);
    match call_node(&primary, &request, state.rpc_timeout).await {
        Some(reply) if reply.record_type() == RecordType::Data => {
            state.cache.put(key, &reply.message);
            Record::data(reply.message)
        }
        _ => Record::ack(ack::KEY_ERROR),
    }
}

async fn handle_put(state: &CoordinatorState, key: &str, value: &str) -> Record {
    let Some((primary, replica)) = placement_pair(state, key) else {
        return Record::ack(ack::INSUFFICIENT_SERVERS);
    };

    let primary_req = Record::request(RecordType::Put, key, value, TableTag::Own);
    let replica_req = Record::request(RecordType::Put, key, value, TableTag::Prev);
    let (primary_reply, replica_reply) = tokio::join!(
        call_node(&primary, &primary_req, state.rpc_timeout),
        call_node(&replica, &replica_req, state.rpc_timeout),
    );

    if acked(&primary_reply, ack::PUT_SUCCESS) && acked(&replica_reply, ack::PUT_SUCCESS) {
        Record::ack(ack::PUT_SUCCESS)
    } else {
        Record::ack(ack::PUT_FAILED)
    }
}

async fn handle_update(state: &CoordinatorState, key: &str, value: &str) -> Record {
    let Some((primary, replica)) = placement_pair(state, key) else {
        return Record::ack(ack::INSUFFICIENT_SERVERS);
    };

    let primary_req = Record::request(RecordType::Update, key, value, TableTag::Own);
    let replica_req = Record::request(RecordType::Update, key, value, TableTag::Prev);
    let (primary_reply, replica_reply) = tokio::join!(
        call_node(&primary, &primary_req, state.rpc_timeout),
        call_node(&replica, &replica_req, state.rpc_timeout),
    );

    if acked(&primary_reply, ack::UPDATE_SUCCESS) && acked(&replica_reply, ack::UPDATE_SUCCESS) {
        state.cache.remove(key);
        Record::ack(ack::UPDATE_SUCCESS)
    } else {
        Record::ack(ack::UPDATE_FAILED)
    }
}

async fn handle_delete(state: &CoordinatorState, key: &str) -> Record {
    let Some((primary, replica)) = placement_pair(state, key) else {
        return Record::ack(ack::INSUFFICIENT_SERVERS);
    };

    let primary_req = Record::request(RecordType::Delete, key, "", TableTag::Own);
    let replica_req = Record::request(RecordType::Delete, key, "", TableTag::Prev);
    let (primary_reply, replica_reply) = tokio::join!(
        call_node(&primary, &primary_req, state.rpc_timeout),
        call_node(&replica, &replica_req, state.rpc_timeout),
    );

    if acked(&primary_reply, ack::DELETE_SUCCESS) && acked(&replica_reply, ack::DELETE_SUCCESS) {
        state.cache.remove(key);
        Record::ack(ack::DELETE_SUCCESS)
    } else {
        Record::ack(ack::DELETE_FAILED)
    }
}

/// Primary = ring successor of `hash(key)`, replica = predecessor. Both
/// RPCs are issued unconditionally even when they resolve to the same
/// node (a single-node ring), keeping the pipeline's fan-out uniform.
fn placement_pair(state: &CoordinatorState, key: &str) -> Option<(NodeId, NodeId)> {
    let h = ring_position(key);
    let (_, primary) = state.ring.successor(h)?;
    let (_, replica) = state.ring.predecessor(h)?;
    Some((primary, replica))
}

fn acked(reply: &Option<Record>, message: &str) -> bool {
    matches!(reply, Some(r) if r.record_type() == RecordType::Ack && r.message == message)
}

/// Opens a fresh connection to `identity`, sends `request`, and reads back
/// one reply record, bounded by `timeout`. Any failure (connect, send,
/// receive, parse, or timeout expiry) is folded into `None` — the caller
/// treats it as that node's operation having failed, never as a session
/// error.
async fn call_node(identity: &NodeId, request: &Record, timeout: Duration) -> Option<Record> {
    let attempt = async {
        let mut stream = TcpStream::connect(identity.as_str()).await.ok()?;
        stream.write_all(request.to_line().as_bytes()).await.ok()?;
        stream.flush().await.ok()?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        Record::from_line(&line).ok()
    };

    tokio::time::timeout(timeout, attempt).await.ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruCache;
    use corelib::HashRing;
    use std::sync::Arc;

    fn state_with_nodes(identities: &[&str]) -> Arc<CoordinatorState> {
        let ring = HashRing::new();
        for identity in identities {
            let id = NodeId::from(*identity);
            ring.insert(ring_position(id.as_str()), id);
        }
        Arc::new(CoordinatorState {
            ring: Arc::new(ring),
            cache: Arc::new(LruCache::new()),
            rpc_timeout: Duration::from_millis(200),
        })
    }

    #[tokio::test]
    async fn get_on_empty_ring_and_cache_miss_reports_no_servers() {
        let state = state_with_nodes(&[]);
        let reply = handle_get(&state, "k").await;
        assert_eq!(reply.message, ack::NO_SERVERS_AVAILABLE);
    }

    #[tokio::test]
    async fn put_on_empty_ring_reports_insufficient_servers() {
        let state = state_with_nodes(&[]);
        let reply = handle_put(&state, "k", "v").await;
        assert_eq!(reply.message, ack::INSUFFICIENT_SERVERS);
    }

    #[tokio::test]
    async fn get_cache_hit_never_touches_the_ring() {
        let state = state_with_nodes(&[]);
        state.cache.put("k", "cached-value");
        let reply = handle_get(&state, "k").await;
        assert_eq!(reply.record_type(), RecordType::Data);
        assert_eq!(reply.message, "cached-value");
    }

    #[test]
    fn placement_pair_degenerates_to_equal_nodes_on_single_node_ring() {
        let state = state_with_nodes(&["127.0.0.1:8081"]);
        let (primary, replica) = placement_pair(&state, "any-key").unwrap();
        assert_eq!(primary, replica);
    }
}
