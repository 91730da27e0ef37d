//! State hashing for lockstep desync detection.
//!
//! Uses FNV-1a: fast, deterministic, and identical on every platform.
//! Not cryptographically secure; it only has to make two diverged
//! simulations disagree.

use crate::simulation::Simulation;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u16(hash: u64, v: u16) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_u32(hash: u64, v: u32) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Hash the player count, unit count, tick and every live unit.
///
/// Units are folded in index order as owner, position, then target, so two
/// simulations hash equal exactly when their observable state is equal.
pub fn state_hash(sim: &Simulation<'_>) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u32(hash, sim.player_count() as u32);
    hash = fnv1a_u32(hash, sim.unit_count() as u32);
    hash = fnv1a_u64(hash, sim.tick_id().0);
    for unit in sim.units() {
        hash = fnv1a_bytes(hash, &[unit.player.0]);
        hash = fnv1a_u16(hash, unit.position.x);
        hash = fnv1a_u16(hash, unit.position.y);
        hash = fnv1a_u16(hash, unit.target.x);
        hash = fnv1a_u16(hash, unit.target.y);
    }
    hash
}
