//! Hash ring data structure.
//!
//! Backed by a `BTreeMap<RingPosition, NodeId>` guarded by a single
//! `parking_lot::Mutex` so every public operation is atomic: no concurrent
//! caller can observe a partial insert or removal (§5 of the design).

use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::hash::{ring_position, RingPosition};
use crate::node::NodeId;

/// The consistent hash ring.
///
/// Cheap to share: wrap in an `Arc<HashRing>` — the interior `Mutex` means a
/// bare clone of the map would be expensive but correct; callers are
/// expected to hold this behind an `Arc`.
#[derive(Default)]
pub struct HashRing {
    positions: Mutex<BTreeMap<RingPosition, NodeId>>,
}

impl HashRing {
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `identity` at `position`. No-op if the position is already
    /// occupied (by any identity, including `identity` itself).
    pub fn insert(&self, position: RingPosition, identity: NodeId) {
        let mut positions = self.positions.lock();
        positions.entry(position).or_insert(identity);
    }

    /// Removes whatever identity occupies `position`. No-op if absent.
    pub fn remove(&self, position: RingPosition) {
        self.positions.lock().remove(&position);
    }

    /// Convenience for the sweep: removes the identity by hashing it to find
    /// its position, rather than requiring the caller to hash it first.
    pub fn remove_identity(&self, identity: &NodeId) {
        let position = ring_position(identity.as_str());
        self.remove(position);
    }

    /// The least position `>= h`, wrapping to the minimum position if none.
    /// `None` only when the ring is empty.
    pub fn successor(&self, h: RingPosition) -> Option<(RingPosition, NodeId)> {
        let positions = self.positions.lock();
        positions
            .range(h..)
            .next()
            .or_else(|| positions.iter().next())
            .map(|(p, id)| (*p, id.clone()))
    }

    /// The greatest position `<= h`, wrapping to the maximum position if
    /// none. `None` only when the ring is empty.
    pub fn predecessor(&self, h: RingPosition) -> Option<(RingPosition, NodeId)> {
        let positions = self.positions.lock();
        positions
            .range(..=h)
            .next_back()
            .or_else(|| positions.iter().next_back())
            .map(|(p, id)| (*p, id.clone()))
    }

    /// Number of occupied positions.
    pub fn size(&self) -> usize {
        self.positions.lock().len()
    }

    /// Whether the ring holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.positions.lock().is_empty()
    }

    /// Snapshot of all (position, identity) pairs, ascending by position.
    /// Used by tests and diagnostics; not on the hot path.
    pub fn snapshot(&self) -> Vec<(RingPosition, NodeId)> {
        self.positions
            .lock()
            .iter()
            .map(|(p, id)| (*p, id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn empty_ring_returns_none() {
        let ring = HashRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.successor(0), None);
        assert_eq!(ring.predecessor(0), None);
    }

    #[test]
    fn duplicate_insert_at_occupied_position_is_noop() {
        let ring = HashRing::new();
        ring.insert(5, id("a"));
        ring.insert(5, id("b"));
        assert_eq!(ring.size(), 1);
        assert_eq!(ring.successor(5), Some((5, id("a"))));
    }

    #[test]
    fn remove_absent_position_is_noop() {
        let ring = HashRing::new();
        ring.insert(5, id("a"));
        ring.remove(6);
        assert_eq!(ring.size(), 1);
    }

    #[test]
    fn successor_tie_break_returns_exact_position() {
        let ring = HashRing::new();
        ring.insert(3, id("a"));
        ring.insert(7, id("b"));
        assert_eq!(ring.successor(3), Some((3, id("a"))));
        assert_eq!(ring.predecessor(7), Some((7, id("b"))));
    }

    #[test]
    fn successor_wraps_to_minimum() {
        let ring = HashRing::new();
        ring.insert(3, id("a"));
        ring.insert(7, id("b"));
        // No position >= 20, so wrap to the minimum (3).
        assert_eq!(ring.successor(20), Some((3, id("a"))));
    }

    #[test]
    fn predecessor_wraps_to_maximum() {
        let ring = HashRing::new();
        ring.insert(3, id("a"));
        ring.insert(7, id("b"));
        // No position <= 0 other than none below 3, so wrap to the maximum (7).
        assert_eq!(ring.predecessor(0), Some((7, id("b"))));
    }

    #[test]
    fn single_node_primary_equals_replica() {
        let ring = HashRing::new();
        ring.insert(10, id("solo"));
        assert_eq!(ring.successor(5), ring.predecessor(5));
    }

    #[test]
    fn traversal_is_ascending_with_no_duplicates() {
        let ring = HashRing::new();
        for (pos, name) in [(5, "a"), (1, "b"), (9, "c"), (1, "d")] {
            ring.insert(pos, id(name));
        }
        let snapshot = ring.snapshot();
        let positions: Vec<_> = snapshot.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![1, 5, 9]);
        // The duplicate insert at position 1 ("d") must not have overwritten "b".
        assert_eq!(snapshot[0].1, id("b"));
    }

    #[test]
    fn remove_identity_hashes_then_removes() {
        let ring = HashRing::new();
        let identity = id("127.0.0.1:8081");
        let pos = ring_position(identity.as_str());
        ring.insert(pos, identity.clone());
        assert_eq!(ring.size(), 1);
        ring.remove_identity(&identity);
        assert!(ring.is_empty());
    }
}
