//! Error types for the simulation and interpolation layers.

use rampart_core::{PlayerId, UnitId};
use thiserror::Error;

/// Errors from [`Simulation`](crate::Simulation) operations.
///
/// A failed operation leaves the simulation exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The simulation has not been initialized with `init()`.
    #[error("simulation is not active")]
    NotActive,
    /// All `PLAYER_MAX` player slots are taken.
    #[error("player limit of {limit} reached")]
    PlayerLimit {
        /// Maximum number of players.
        limit: usize,
    },
    /// Spawning the player's units would exceed the unit storage, itself
    /// at most `UNIT_MAX`.
    #[error("unit limit of {limit} reached")]
    UnitLimit {
        /// Maximum number of units.
        limit: usize,
    },
    /// An order names a player that does not exist in this match.
    #[error("order references undefined player {player}")]
    UndefinedPlayer {
        /// The player id carried by the order.
        player: PlayerId,
    },
    /// An order's unit range runs past the last live unit.
    #[error("order unit range {first}+{count} exceeds unit count {unit_count}")]
    UnitOutOfRange {
        /// First unit of the range.
        first: UnitId,
        /// Number of units in the range.
        count: u16,
        /// Live units in the simulation.
        unit_count: usize,
    },
    /// An order moves a unit that belongs to another player.
    #[error("player {player} does not own unit {unit}")]
    NotOwned {
        /// The offending unit.
        unit: UnitId,
        /// The player that issued the order.
        player: PlayerId,
    },
}

/// Errors from [`Interpolation`](crate::Interpolation).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InterpolationError {
    /// The simulation's unit set no longer matches the one interpolation
    /// was seeded with; `Interpolation::init` must be called again.
    #[error("interpolation seeded with {seeded} units, simulation has {actual}")]
    UnitCountMismatch {
        /// Unit count at the last `init`.
        seeded: usize,
        /// Current simulation unit count.
        actual: usize,
    },
    /// The simulation has more units than the position storage holds.
    #[error("interpolation holds {capacity} units, simulation has {units}")]
    CapacityExceeded {
        /// Units the position storage holds.
        capacity: usize,
        /// Current simulation unit count.
        units: usize,
    },
}
