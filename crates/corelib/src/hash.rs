//! The single deterministic hash used to place both node identities and keys
//! on the ring.
//!
//! # Algorithm
//!
//! For a string `s` and modulus `R`, starting from `h = 0`, fold each `char`'s
//! scalar value `c` in:
//!
//! ```text
//! h := (h + (c * M) mod R) mod R
//! ```
//!
//! with `M = HASH_MULTIPLIER`, then return `(h + R) mod R` (the final
//! reduction is a no-op for this formula but keeps the result obviously
//! non-negative regardless of how the fold is rewritten).
//!
//! `c * M` is carried out in `u64` so it can never overflow before the modulo
//! reduction (`c <= u32::MAX` as a `char`'s scalar value, `M < 10^8`).
//!
//! This is the *only* hash in the system: nodes and keys share it, which is
//! an invariant the placement engine depends on (§4.1 of the design).

/// Ring size: positions range over `[0, RING_SIZE)`.
pub const RING_SIZE: u32 = 31;

/// Multiplier used by the per-character fold.
pub const HASH_MULTIPLIER: u64 = 99_999_989;

/// A position on the hash ring, always `< RING_SIZE`.
pub type RingPosition = u32;

/// Maps an arbitrary string (a key or a node identity) onto a ring position.
pub fn ring_position(s: &str) -> RingPosition {
    let r = RING_SIZE as u64;
    let mut h: u64 = 0;
    for c in s.chars() {
        let c = c as u64;
        h = (h + (c * HASH_MULTIPLIER) % r) % r;
    }
    ((h + r) % r) as RingPosition
}
