//! Consistent hash ring: the placement engine.
//!
//! A `Mutex`-guarded `BTreeMap<RingPosition, NodeId>` that assigns exactly one
//! position to every participating node (no vnodes) and answers the
//! successor/predecessor queries the coordinator uses to pick the primary
//! and replica for a key.

pub mod ring;

pub use ring::HashRing;
