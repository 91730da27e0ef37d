//! Strongly-typed handles and the [`Coord`] grid position.
//!
//! Entities are referenced by dense integer handles, never by address.
//! Handles are assigned in creation order starting at zero, so they double
//! as indices into the fixed-capacity arrays that own the entities.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::limits::PLAYER_MAX;

/// Wall-clock time in microseconds, as supplied by the caller that owns the
/// real clock.
pub type Micros = u64;

/// Identifies a player within a match.
///
/// Assigned densely from 0 by `Simulation::create_player`. Plain-old-data
/// so it can sit inside arena-allocated unit arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Sentinel for "no player assigned yet" (one past the last valid id).
    pub const UNDEFINED: PlayerId = PlayerId(PLAYER_MAX as u8);

    /// The id as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is a real player id rather than [`PlayerId::UNDEFINED`].
    pub fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for PlayerId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Identifies a unit within a match.
///
/// `UnitId(n)` is the n-th slot of the simulation's unit array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u16);

impl UnitId {
    /// The id as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for UnitId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Monotonically increasing simulation tick counter.
///
/// Zero after `Simulation::init`; incremented once per executed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A cell position on the map grid.
///
/// Plain-old-data so it can be embedded directly in wire payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Coord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_player_is_one_past_max() {
        assert_eq!(PlayerId::UNDEFINED.index(), PLAYER_MAX);
        assert!(!PlayerId::UNDEFINED.is_defined());
        assert!(PlayerId(0).is_defined());
    }

    #[test]
    fn tick_next_increments() {
        assert_eq!(TickId(0).next(), TickId(1));
        assert_eq!(TickId(41).next(), TickId(42));
    }

    #[test]
    fn coord_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Coord>(), 4);
        let c = Coord::new(3, 7);
        assert_eq!(bytemuck::bytes_of(&c), &[3, 0, 7, 0]);
    }

    #[test]
    fn display_formats() {
        assert_eq!(PlayerId(3).to_string(), "3");
        assert_eq!(UnitId(12).to_string(), "12");
        assert_eq!(Coord::new(1, 2).to_string(), "(1, 2)");
    }
}
