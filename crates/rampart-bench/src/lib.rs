//! Benchmark profiles for the Rampart client runtime.
//!
//! - [`full_match_config`]: eight players with the largest formations
//!   `UNIT_MAX` allows
//! - [`sweep_orders`]: one order per player moving its whole formation

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rampart_core::{Coord, PlayerId, UnitId, PLAYER_MAX, UNIT_MAX};
use rampart_engine::GameConfig;
use rampart_sim::Order;

/// Units per player in [`full_match_config`].
pub const FULL_MATCH_UNITS_PER_PLAYER: usize = UNIT_MAX / PLAYER_MAX;

/// Configuration for an eight-player match with `UNIT_MAX` units.
pub fn full_match_config() -> GameConfig {
    GameConfig {
        units_per_player: FULL_MATCH_UNITS_PER_PLAYER,
        ..GameConfig::default()
    }
}

/// One order per player sending its formation toward a turn-dependent
/// target.
pub fn sweep_orders(players: usize, units_per_player: usize, turn: u64) -> Vec<Order> {
    (0..players)
        .map(|p| {
            let offset = ((turn * 7 + p as u64 * 13) % 256) as u16;
            Order::new(
                PlayerId(p as u8),
                UnitId((p * units_per_player) as u16),
                units_per_player as u16,
                Coord::new(64 + offset, 512 - offset),
            )
        })
        .collect()
}
