//! Match-wide capacity limits and the fixed simulation cadence.

/// Maximum number of players in one match.
pub const PLAYER_MAX: usize = 8;

/// Maximum number of units across all players in one match.
pub const UNIT_MAX: usize = 4096;

/// Duration of one simulation tick in microseconds (100 ms).
///
/// The tick cadence is independent of the render and network rates.
pub const TICK_DURATION_US: u64 = 100_000;
