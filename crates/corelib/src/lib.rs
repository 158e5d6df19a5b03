//! Core library shared by every role in the cluster (client, coordinator,
//! data node):
//! - the wire protocol (a single JSON record type, one per line)
//! - the deterministic hash function
//! - node identity
//! - the hash ring placement engine

pub mod error;
pub mod hash;
pub mod node;
pub mod protocol;
pub mod ring;

pub use error::{Error, Result};
pub use hash::{ring_position, RingPosition, HASH_MULTIPLIER, RING_SIZE};
pub use node::NodeId;
pub use protocol::{ack, Record, RecordType, TableTag};
pub use ring::HashRing;
