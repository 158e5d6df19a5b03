//! Integration tests for placement: hashing node identities and keys onto
//! the same ring and walking successor/predecessor from outside the crate.

use corelib::hash::ring_position;
use corelib::{HashRing, NodeId};

fn populated_ring(identities: &[&str]) -> HashRing {
    let ring = HashRing::new();
    for identity in identities {
        let id = NodeId::from(*identity);
        ring.insert(ring_position(id.as_str()), id);
    }
    ring
}

#[test]
fn empty_ring_has_no_placement() {
    let ring = HashRing::new();
    assert!(ring.is_empty());
    assert_eq!(ring.successor(0), None);
}

#[test]
fn single_node_is_both_primary_and_replica_for_every_key() {
    let ring = populated_ring(&["127.0.0.1:8081"]);
    let solo = NodeId::from("127.0.0.1:8081");

    for key in ["alpha", "beta", "gamma", "a-much-longer-key-name"] {
        let h = ring_position(key);
        let (_, primary) = ring.successor(h).unwrap();
        let (_, replica) = ring.predecessor(h).unwrap();
        assert_eq!(primary, solo);
        assert_eq!(replica, solo);
    }
}

#[test]
fn placement_is_deterministic_across_lookups() {
    let ring = populated_ring(&["10.0.0.1:9000", "10.0.0.2:9000", "10.0.0.3:9000"]);
    let h = ring_position("same-key-every-time");

    let first = ring.successor(h);
    let second = ring.successor(h);
    assert_eq!(first, second);
}

#[test]
fn joining_node_is_immediately_reachable() {
    let ring = populated_ring(&["10.0.0.1:9000"]);
    assert_eq!(ring.size(), 1);

    let newcomer = NodeId::from("10.0.0.2:9000");
    ring.insert(ring_position(newcomer.as_str()), newcomer.clone());
    assert_eq!(ring.size(), 2);

    let (_, found) = ring.successor(ring_position(newcomer.as_str())).unwrap();
    assert_eq!(found, newcomer);
}

#[test]
fn departing_node_is_no_longer_reachable() {
    let ring = populated_ring(&["10.0.0.1:9000", "10.0.0.2:9000"]);
    let leaving = NodeId::from("10.0.0.1:9000");

    ring.remove_identity(&leaving);
    assert_eq!(ring.size(), 1);

    for (_, id) in ring.snapshot() {
        assert_ne!(id, leaving);
    }
}
